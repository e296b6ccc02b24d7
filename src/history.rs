//! Snapshot-based undo history.
//!
//! Snapshots are recorded only on explicit commits, never per keystroke.
//! The stack is bounded and evicts its oldest entries first.

use std::collections::VecDeque;

use crate::error::EditError;

/// Maximum number of snapshots kept by default
pub const MAX_HISTORY: usize = 50;

/// Bounded stack of buffer snapshots.
///
/// The top entry is the current state. No two adjacent entries are equal.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    snapshots: VecDeque<String>,
    max_size: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    /// Create a new history with the default cap
    pub fn new() -> Self {
        Self::with_max_size(MAX_HISTORY)
    }

    /// Create a new history with the specified cap (at least 1)
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record `buffer` unless it equals the current top entry.
    pub fn commit(&mut self, buffer: &str) {
        if self.snapshots.back().is_some_and(|top| top == buffer) {
            tracing::trace!("history: skipped duplicate snapshot");
            return;
        }

        self.snapshots.push_back(buffer.to_string());

        while self.snapshots.len() > self.max_size {
            self.snapshots.pop_front();
            tracing::trace!(cap = self.max_size, "history: evicted oldest snapshot");
        }

        tracing::debug!(depth = self.snapshots.len(), "history: committed snapshot");
    }

    /// Discard the current state and return the prior one.
    ///
    /// Requires the current state plus at least one earlier state; otherwise
    /// the stack is left untouched.
    pub fn undo(&mut self) -> Result<String, EditError> {
        if self.snapshots.len() < 2 {
            return Err(EditError::NothingToUndo);
        }

        self.snapshots.pop_back();
        let previous = self
            .snapshots
            .back()
            .cloned()
            .ok_or(EditError::NothingToUndo)?;

        tracing::debug!(depth = self.snapshots.len(), "history: undo");
        Ok(previous)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.snapshots.len() >= 2
    }

    /// The most recently committed snapshot
    pub fn current(&self) -> Option<&str> {
        self.snapshots.back().map(String::as_str)
    }

    /// Snapshots from oldest to newest
    pub fn snapshots(&self) -> impl Iterator<Item = &str> {
        self.snapshots.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(history: &HistoryStore) -> Vec<&str> {
        history.snapshots().collect()
    }

    #[test]
    fn test_first_commit_always_appends() {
        let mut history = HistoryStore::new();
        history.commit("");
        assert_eq!(stack(&history), vec![""]);
    }

    #[test]
    fn test_duplicate_adjacent_commit_suppressed() {
        let mut history = HistoryStore::new();
        history.commit("a");
        history.commit("b");
        history.commit("b");
        history.commit("c");
        assert_eq!(stack(&history), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_non_adjacent_duplicates_kept() {
        let mut history = HistoryStore::new();
        history.commit("a");
        history.commit("b");
        history.commit("a");
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_undo_returns_prior_state() {
        let mut history = HistoryStore::new();
        for s in ["a", "b", "b", "c"] {
            history.commit(s);
        }

        assert_eq!(history.undo().unwrap(), "b");
        assert_eq!(stack(&history), vec!["a", "b"]);
    }

    #[test]
    fn test_undo_requires_two_entries() {
        let mut history = HistoryStore::new();
        assert!(matches!(history.undo(), Err(EditError::NothingToUndo)));

        history.commit("only");
        assert!(matches!(history.undo(), Err(EditError::NothingToUndo)));
        assert_eq!(stack(&history), vec!["only"]);
    }

    #[test]
    fn test_commit_after_undo_discards_future() {
        let mut history = HistoryStore::new();
        history.commit("a");
        history.commit("b");
        history.undo().unwrap();
        history.commit("x");
        assert_eq!(stack(&history), vec!["a", "x"]);
    }

    #[test]
    fn test_history_max_size() {
        let mut history = HistoryStore::new();
        for i in 0..60 {
            history.commit(&format!("state {}", i));
        }

        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.snapshots().next(), Some("state 10"));
        assert_eq!(history.current(), Some("state 59"));
    }

    #[test]
    fn test_custom_max_size() {
        let mut history = HistoryStore::with_max_size(3);
        for i in 0..5 {
            history.commit(&i.to_string());
        }
        assert_eq!(stack(&history), vec!["2", "3", "4"]);
    }
}
