use std::str::FromStr;

use ordermap::OrderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::Element;
use crate::error::{LabError, LabResult};
use crate::sets::{SetKind, SetRecord, Universe};

/// The full state of a registry at one instant. Owns all of its data, so a clone is a deep copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub sets: Vec<(String, SetRecord)>,
    pub next_set_id: u64,
}

/// All defined sets, keyed by name, in the order they were created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    sets: OrderMap<String, SetRecord>,
    next_set_id: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            sets: OrderMap::new(),
            next_set_id: 1,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            sets: snapshot.sets.into_iter().collect(),
            next_set_id: snapshot.next_set_id,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            sets: self
                .sets
                .iter()
                .map(|(name, record)| (name.clone(), record.clone()))
                .collect(),
            next_set_id: self.next_set_id,
        }
    }

    /// Checks that `name` could be registered right now.
    pub fn validate_name(&self, name: &str) -> LabResult<()> {
        if name.trim().is_empty() {
            Err(LabError::EmptyName)
        } else if self.sets.contains_key(name) {
            Err(LabError::DuplicateName {
                name: name.to_owned(),
            })
        } else {
            Ok(())
        }
    }

    pub fn create(
        &mut self,
        name: &str,
        kind: SetKind,
        source_text: impl Into<String>,
        elements: Vec<Element>,
    ) -> LabResult<&SetRecord> {
        self.validate_name(name)?;
        let record = SetRecord::new(kind, source_text.into(), elements);
        debug!(name, %kind, count = record.cardinality(), "registered set");
        self.next_set_id += 1;
        let (index, _) = self.sets.insert_full(name.to_owned(), record);
        Ok(&self.sets[index])
    }

    pub fn delete(&mut self, name: &str) -> LabResult<SetRecord> {
        let Some(record) = self.sets.remove(name) else {
            return Err(LabError::NotFound {
                name: name.to_owned(),
            });
        };
        debug!(name, "deleted set");
        Ok(record)
    }

    /// Copies a universal template into a new set carrying the template's symbol as its name.
    pub fn import_template(&mut self, template: &str) -> LabResult<(String, &SetRecord)> {
        let Ok(universe) = Universe::from_str(template.trim()) else {
            return Err(LabError::UnknownTemplate {
                name: template.to_owned(),
            });
        };
        let name = universe.to_string();
        let elements = universe.elements();
        let record = self.create(&name, SetKind::Universal, "", elements)?;
        Ok((name, record))
    }

    pub fn get(&self, name: &str) -> Option<&SetRecord> {
        self.sets.get(name)
    }

    pub fn elements(&self, name: &str) -> LabResult<&[Element]> {
        self.get(name)
            .map(|record| record.elements.as_slice())
            .ok_or_else(|| LabError::NotFound {
                name: name.to_owned(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &SetRecord)> {
        self.sets
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn next_set_id(&self) -> u64 {
        self.next_set_id
    }

    pub fn clear(&mut self) {
        self.sets.clear();
        self.next_set_id = 1;
    }
}
