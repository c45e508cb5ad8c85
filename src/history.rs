//! Where the explorer has been, most recent last.
use planes::NavigationState;

/// A stack of earlier navigation states.
#[derive(Clone, Debug, Default)]
pub struct HistoryStack {
    entries: Vec<NavigationState>,
}

impl HistoryStack {
    /// An empty history.
    pub fn new() -> HistoryStack {
        HistoryStack::default()
    }

    /// Remember a state before navigating away from it.
    pub fn push(&mut self, state: NavigationState) {
        self.entries.push(state);
    }

    /// The most recent state, removed from the stack.  `None` when
    /// there is no history.
    pub fn pop(&mut self) -> Option<NavigationState> {
        self.entries.pop()
    }

    /// The most recent state, left on the stack.
    pub fn peek(&self) -> Option<&NavigationState> {
        self.entries.last()
    }

    /// The number of remembered states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Describes an empty history.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
