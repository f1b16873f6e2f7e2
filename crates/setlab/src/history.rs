//! Linear undo log.
//!
//! Entries are owned copies: [`History::record`] clones what it is given and [`History::undo`]
//! hands out a clone, so edits on either side of the boundary never show up on the other. With
//! [`Snapshot`](crate::registry::Snapshot), which owns all of its data, a clone is a deep copy.

#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }
}

impl<T: Clone> History<T> {
    /// Drops everything after the cursor, then appends a copy of `snapshot` and points at it.
    pub fn record(&mut self, snapshot: &T) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot.clone());
        self.cursor = self.entries.len() - 1;
    }

    /// Steps back one entry and returns a copy of it. `None` at the first entry.
    pub fn undo(&mut self) -> Option<T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }
}
