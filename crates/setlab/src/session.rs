//! The application context: one registry, its undo log and the store mirroring it.
//!
//! Presentation code drives a [`Session`] through [`Command`]s and renders the plain-data
//! [`Outcome`]s it gets back. A command that fails leaves registry, history and store untouched.
//! Every command that succeeds in changing the registry records a snapshot and then persists it.

use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::algebra::{SetOp, SubsetRelation, is_member, subset_relation};
use crate::element::Element;
use crate::error::{LabError, LabResult};
use crate::history::History;
use crate::interpret::{interpret_description, interpret_predicate};
use crate::parse::parse_elements;
use crate::registry::{Registry, Snapshot};
use crate::sets::{SetKind, SetRecord, Universe};
use crate::store::Store;
use crate::visual::{Bar, VennRegions, cardinality_chart, venn};

/// The three ways of writing down a new set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// `{1, 2, x}`
    Literal(String),
    /// `{ x | x ∈ ℕ , x ≤ 5 }`
    Predicate(String),
    /// "odd numbers from 1 to 10"
    Verbal(String),
}

impl Definition {
    pub fn kind(&self) -> SetKind {
        match self {
            Self::Literal(_) => SetKind::Literal,
            Self::Predicate(_) => SetKind::Predicate,
            Self::Verbal(_) => SetKind::Description,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Predicate(text) | Self::Verbal(text) => text,
        }
    }

    fn what(&self) -> &'static str {
        match self {
            Self::Literal(_) => "elements",
            Self::Predicate(_) => "expression",
            Self::Verbal(_) => "description",
        }
    }

    fn resolve(&self) -> Vec<Element> {
        match self {
            Self::Literal(text) => parse_elements(text),
            Self::Predicate(expression) => interpret_predicate(expression),
            Self::Verbal(description) => interpret_description(description),
        }
    }

    /// Enumerated sets keep no source text.
    fn source_text(&self) -> String {
        match self {
            Self::Literal(_) => String::new(),
            Self::Predicate(text) | Self::Verbal(text) => text.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear every set. Undoable.
    Start,
    Define {
        name: String,
        definition: Definition,
    },
    ImportTemplate(String),
    Delete(String),
    Undo,
    Operate {
        op: SetOp,
        left: String,
        right: String,
    },
    Member {
        candidate: String,
        set: String,
    },
    Subset {
        left: String,
        right: String,
    },
    Venn {
        left: String,
        right: String,
    },
    Cardinality,
    List,
    Templates,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Started,
    Defined { name: String, record: SetRecord },
    Imported { name: String, record: SetRecord },
    Deleted { name: String },
    Undone { restored: bool },
    Operation { op: SetOp, elements: Vec<Element> },
    Membership { candidate: String, is_member: bool },
    Subset(SubsetRelation),
    Venn(VennRegions),
    Chart(Vec<Bar>),
    Listing(Vec<(String, SetRecord)>),
    Templates(Vec<(Universe, Vec<Element>)>),
}

pub struct Session<S> {
    registry: Registry,
    history: History<Snapshot>,
    store: S,
}

impl<S: Store> Session<S> {
    /// Restores whatever `store` holds and makes it the first history entry. Unreadable state is
    /// logged and replaced by an empty registry.
    pub fn open(store: S) -> Self {
        let registry = match store.load() {
            Ok(Some(snapshot)) => {
                info!(sets = snapshot.sets.len(), "restored saved sets");
                Registry::from_snapshot(snapshot)
            }
            Ok(None) => Registry::new(),
            Err(err) => {
                warn!(%err, "ignoring unreadable saved state");
                Registry::new()
            }
        };

        let mut history = History::new();
        history.record(&registry.snapshot());
        Self {
            registry,
            history,
            store,
        }
    }

    /// Writes a final snapshot and hands the store back.
    pub fn close(mut self) -> S {
        let snapshot = self.registry.snapshot();
        self.persist(&snapshot);
        debug!("session closed");
        self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&mut self, command: Command) -> LabResult<Outcome> {
        match command {
            Command::Start => {
                self.start();
                Ok(Outcome::Started)
            }
            Command::Define { name, definition } => self.define(&name, &definition),
            Command::ImportTemplate(template) => self.import_template(&template),
            Command::Delete(name) => self.delete(&name),
            Command::Undo => Ok(Outcome::Undone {
                restored: self.undo(),
            }),
            Command::Operate { op, left, right } => {
                let elements = op.apply(
                    self.registry.elements(&left)?,
                    self.registry.elements(&right)?,
                );
                Ok(Outcome::Operation { op, elements })
            }
            Command::Member { candidate, set } => {
                let is_member = is_member(&candidate, self.registry.elements(&set)?);
                Ok(Outcome::Membership {
                    candidate,
                    is_member,
                })
            }
            Command::Subset { left, right } => Ok(Outcome::Subset(subset_relation(
                self.registry.elements(&left)?,
                self.registry.elements(&right)?,
            ))),
            Command::Venn { left, right } => Ok(Outcome::Venn(venn(
                self.registry.elements(&left)?,
                self.registry.elements(&right)?,
            ))),
            Command::Cardinality => Ok(Outcome::Chart(cardinality_chart(&self.registry))),
            Command::List => Ok(Outcome::Listing(self.registry.snapshot().sets)),
            Command::Templates => Ok(Outcome::Templates(
                Universe::iter()
                    .map(|universe| (universe, universe.elements()))
                    .collect(),
            )),
        }
    }

    pub fn start(&mut self) {
        self.registry.clear();
        info!("started a new session");
        self.commit();
    }

    pub fn define(&mut self, name: &str, definition: &Definition) -> LabResult<Outcome> {
        let name = name.trim();
        self.registry.validate_name(name)?;
        if definition.text().trim().is_empty() {
            return Err(LabError::EmptyDefinition {
                name: name.to_owned(),
                what: definition.what(),
            });
        }

        let record = self
            .registry
            .create(
                name,
                definition.kind(),
                definition.source_text(),
                definition.resolve(),
            )?
            .clone();
        self.commit();
        Ok(Outcome::Defined {
            name: name.to_owned(),
            record,
        })
    }

    pub fn import_template(&mut self, template: &str) -> LabResult<Outcome> {
        let (name, record) = self.registry.import_template(template)?;
        let record = record.clone();
        self.commit();
        Ok(Outcome::Imported { name, record })
    }

    pub fn delete(&mut self, name: &str) -> LabResult<Outcome> {
        let name = name.trim();
        self.registry.delete(name)?;
        self.commit();
        Ok(Outcome::Deleted {
            name: name.to_owned(),
        })
    }

    /// Replaces the registry with the previous history entry. `false` when already at the
    /// oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            debug!("nothing to undo");
            return false;
        };
        self.registry = Registry::from_snapshot(snapshot);
        debug!(sets = self.registry.len(), "undid last change");
        let snapshot = self.registry.snapshot();
        self.persist(&snapshot);
        true
    }

    fn commit(&mut self) {
        let snapshot = self.registry.snapshot();
        self.history.record(&snapshot);
        self.persist(&snapshot);
    }

    fn persist(&mut self, snapshot: &Snapshot) {
        if let Err(err) = self.store.save(snapshot) {
            warn!(%err, "could not persist sets");
        }
    }
}
