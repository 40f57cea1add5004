//! Bounded linear undo/redo history.

use crate::error::{SketchError, SketchResult};
use crate::object::{ObjectId, Snapshot};
use std::collections::VecDeque;

/// Default number of undo steps kept.
pub const DEFAULT_UNDO_STEPS: usize = 25;

/// One reversible edit: an object and its state before and after.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub object: ObjectId,
    pub previous: Snapshot,
    pub current: Snapshot,
}

/// Ordered entries with a fixed capacity and a cursor.
///
/// The cursor counts applied entries: 0 means "before the first entry",
/// `len()` means "at the tail". Entries past the cursor are redoable until
/// the next [`keep`](Self::keep) truncates them.
#[derive(Debug, Clone)]
pub struct HistoryStore<T = HistoryEntry> {
    entries: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T> Default for HistoryStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_STEPS)
    }
}

impl<T> HistoryStore<T> {
    /// Create an empty store holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            cursor: 0,
            capacity,
        }
    }

    /// Append an entry, dropping any redoable entries first and evicting
    /// the oldest one when full.
    pub fn keep(&mut self, entry: T) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Entry at the cursor (the last applied one).
    pub fn current(&self) -> SketchResult<&T> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .ok_or(SketchError::EmptyHistory)
    }

    /// Entry a redo would apply next.
    pub fn peek_redo(&self) -> SketchResult<&T> {
        self.entries
            .get(self.cursor)
            .ok_or(SketchError::RedoUnavailable)
    }

    /// Step back and return the entry to revert.
    pub fn undo(&mut self) -> SketchResult<&T> {
        if !self.can_undo() {
            return Err(SketchError::EmptyHistory);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step forward and return the entry to re-apply.
    pub fn redo(&mut self) -> SketchResult<&T> {
        if !self.can_redo() {
            return Err(SketchError::RedoUnavailable);
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor - 1])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Number of applied entries.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first, applied or not.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl HistoryStore<HistoryEntry> {
    /// Whether any entry (applied or redoable) refers to the object.
    pub fn references(&self, id: ObjectId) -> bool {
        self.entries.iter().any(|entry| entry.object == id)
    }
}
