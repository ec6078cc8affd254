//! Undo/redo history of config snapshots
//!
//! A flat list of snapshots with a cursor. Pushing after an undo drops the
//! redo tail; pushing past capacity evicts the oldest snapshot.

use std::collections::VecDeque;

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Clone, Debug)]
pub struct History<T> {
    entries: VecDeque<T>,
    /// Index of the current snapshot in `entries`
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// Start a history whose only snapshot is `initial`
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.max(1));
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record a new current snapshot
    pub fn push(&mut self, snapshot: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back; returns the snapshot that is now current
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward; returns the snapshot that is now current
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new(0);
        history.push(1);
        history.push(2);

        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_after_undo_truncates_redo() {
        let mut history = History::new("a");
        history.push("b");
        history.push("c");
        history.undo();
        history.push("d");

        assert!(!history.can_redo());
        assert_eq!(history.current(), Some(&"d"));
        assert_eq!(history.undo(), Some(&"b"));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::with_capacity(0, 3);
        for i in 1..=5 {
            history.push(i);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some(&4));
        assert_eq!(history.undo(), Some(&3));
        assert!(!history.can_undo());
    }
}
