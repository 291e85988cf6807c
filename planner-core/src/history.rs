//! Bounded linear undo/redo history of layer snapshots.
//!
//! A snapshot is recorded *before* a mutation, and only once the mutation
//! is certain. Undo hands back the snapshot and keeps the live state for
//! redo; redo does the reverse. Recording a new snapshot after an undo
//! discards the redo tail.

use crate::Layer;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Value copy of everything undo restores.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// All layers with their items.
    pub layers: Vec<Layer>,
    /// Index of the current layer.
    pub current_layer: usize,
}

/// Undo/redo stacks with a fixed depth.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl History {
    /// Create an empty history keeping at most `max_depth` undo steps.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state before a mutation.
    pub fn save_state(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. `current` is kept for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward. `current` is kept for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo steps available.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Configured depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(n: usize) -> Snapshot {
        Snapshot {
            layers: (0..n).map(|i| Layer::new(Layer::default_name(i + 1))).collect(),
            current_layer: 0,
        }
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = History::default();
        history.save_state(snap(1));
        assert_eq!(history.undo(snap(2)), Some(snap(1)));
        assert!(!history.can_undo());
        assert_eq!(history.redo(snap(1)), Some(snap(2)));
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn test_save_after_undo_discards_redo_tail() {
        let mut history = History::default();
        history.save_state(snap(1));
        history.save_state(snap(2));
        let _ = history.undo(snap(3));
        assert!(history.can_redo());
        history.save_state(snap(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut history = History::new(20);
        for i in 0..25 {
            history.save_state(snap(i + 1));
        }
        assert_eq!(history.undo_count(), 20);
        let mut undone = 0;
        while history.undo(snap(0)).is_some() {
            undone += 1;
        }
        assert_eq!(undone, 20);
    }
}
