//! Bounded history of level transitions.

use std::collections::VecDeque;

use statuswatch_types::HistoryEntry;

/// Maximum number of transitions to keep.
pub const HISTORY_CAPACITY: usize = 10;

/// Most-recent-first record of level transitions.
///
/// Appending beyond [`HISTORY_CAPACITY`] silently drops the oldest entry.
/// The log has a single writer (the monitor loop); readers get copies via
/// [`HistoryLog::entries`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Record a transition as the most recent entry.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Copy of the entries, most recent first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Iterate over the entries, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recent entry, if any.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
