//! Durable storage for registry snapshots.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::registry::Snapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single slot holding the latest complete snapshot.
pub trait Store {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;
}

/// JSON file on disk. Writes go to a temporary sibling that is then persisted over the slot, so
/// the slot always holds a whole snapshot.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Store for FileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;

        let json = serde_json::to_string_pretty(snapshot)?;
        let mut staging = NamedTempFile::new_in(parent).map_err(|err| self.io_error(err))?;
        staging
            .write_all(json.as_bytes())
            .map_err(|err| self.io_error(err))?;
        staging
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

/// Keeps the serialized snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl Store for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.slot = Some(serde_json::to_string(snapshot)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        self.slot
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StoreError::from)
    }
}
