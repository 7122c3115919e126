//! Linear undo/redo over full state snapshots.

/// Snapshot history with a current state, an undo stack and a redo stack.
///
/// Only [`History::push`] discards forward states; undo and redo just move
/// the cursor.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    current: T,
    undo_stack: Vec<T>,
    redo_stack: Vec<T>,
    limit: Option<usize>,
}

impl<T: Clone + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: None,
        }
    }

    /// Keep at most `limit` undo states; older ones are dropped first.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.enforce_limit();
        self
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Record a new current state. Clears the redo stack.
    pub fn push(&mut self, state: T) {
        let previous = std::mem::replace(&mut self.current, state);
        self.undo_stack.push(previous);
        self.redo_stack.clear();
        self.enforce_limit();
    }

    /// Step back. Returns the new current state, or `None` at the start.
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.undo_stack.pop()?;
        let current = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(current);
        Some(&self.current)
    }

    /// Step forward. Returns the new current state, or `None` at the end.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.redo_stack.pop()?;
        let current = std::mem::replace(&mut self.current, next);
        self.undo_stack.push(current);
        Some(&self.current)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of states reachable by undo.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Drop all recorded states, keeping the current one.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut history = History::new(vec![1]);
        history.push(vec![1, 2]);
        history.push(vec![1, 2, 3]);

        assert_eq!(history.undo(), Some(&vec![1, 2]));
        assert_eq!(history.undo(), Some(&vec![1]));
        assert_eq!(history.undo(), None);
        assert!(!history.can_undo());

        assert_eq!(history.redo(), Some(&vec![1, 2]));
        assert_eq!(history.redo(), Some(&vec![1, 2, 3]));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_discards_forward_states() {
        let mut history = History::new(0);
        history.push(1);
        history.push(2);
        history.undo();
        assert!(history.can_redo());
        history.push(5);
        assert!(!history.can_redo());
        assert_eq!(*history.current(), 5);
        assert_eq!(history.undo(), Some(&1));
    }

    #[test]
    fn test_undo_redo_do_not_discard() {
        let mut history = History::new('a');
        history.push('b');
        history.undo();
        history.redo();
        history.undo();
        assert!(history.can_redo());
        assert_eq!(*history.current(), 'a');
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(0).with_limit(Some(2));
        for i in 1..=5 {
            history.push(i);
        }
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(), Some(&4));
        assert_eq!(history.undo(), Some(&3));
        assert_eq!(history.undo(), None);
    }
}
