//! Ordered storage of conversation turns.

use deeptalk_types::turn::Turn;

/// The ordered sequence of turns for one session.
///
/// The store owns the sequence exclusively; these methods are the only
/// mutators. It is created empty at session start, lives for the session,
/// and is reset by [`clear`](Self::clear). A well-formed conversation
/// alternates user/assistant starting with a user turn, but the store
/// tolerates a trailing unpaired user turn (request in flight) and never
/// merges two same-role turns.
#[derive(Debug, Default)]
pub struct TurnStore {
    turns: Vec<Turn>,
}

impl TurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Append a user turn (new input).
    pub fn push_user(&mut self, visible: impl Into<String>) {
        self.turns.push(Turn::User {
            visible: visible.into(),
        });
    }

    /// Commit a completed assistant turn.
    pub fn push_assistant(&mut self, visible: impl Into<String>, reasoning: Option<String>) {
        self.turns.push(Turn::Assistant {
            visible: visible.into(),
            reasoning,
        });
    }

    /// Remove and return the most recent turn (cancellation rollback).
    pub fn pop_last(&mut self) -> Option<Turn> {
        self.turns.pop()
    }

    /// Remove the last user+assistant pair, or the dangling last turn if
    /// the last two turns do not form a pair. Returns the removed turns,
    /// oldest first.
    pub fn pop_last_pair(&mut self) -> Vec<Turn> {
        let n = self.turns.len();
        if n >= 2 && self.turns[n - 2].is_user() && self.turns[n - 1].is_assistant() {
            return self.turns.split_off(n - 2);
        }
        self.turns.pop().into_iter().collect()
    }

    /// Reset to empty.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(turns: &[(&str, Option<&str>)]) -> TurnStore {
        // (visible, None) => user turn; (visible, Some(reasoning)) => assistant.
        let mut store = TurnStore::new();
        for (i, (visible, reasoning)) in turns.iter().enumerate() {
            if i % 2 == 0 {
                store.push_user(*visible);
            } else {
                store.push_assistant(*visible, reasoning.map(str::to_string));
            }
        }
        store
    }

    #[test]
    fn test_push_preserves_chronological_order() {
        let store = store_with(&[("a", None), ("b", Some("cot"))]);
        assert_eq!(store.len(), 2);
        assert!(store.turns()[0].is_user());
        assert!(store.turns()[1].is_assistant());
        assert_eq!(store.turns()[1].reasoning(), Some("cot"));
    }

    #[test]
    fn test_pop_last_pair_removes_full_pair() {
        let mut store = store_with(&[("a", None), ("b", None)]);
        let removed = store.pop_last_pair();
        assert_eq!(removed.len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_pop_last_pair_removes_only_dangling_turn() {
        let mut store = store_with(&[("a", None), ("b", None)]);
        store.push_user("c");
        let removed = store.pop_last_pair();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].visible(), "c");
        assert_eq!(store.len(), 2);
        assert_eq!(store.turns()[0].visible(), "a");
        assert_eq!(store.turns()[1].visible(), "b");
    }

    #[test]
    fn test_pop_last_pair_on_empty_store() {
        let mut store = TurnStore::new();
        assert!(store.pop_last_pair().is_empty());
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut store = store_with(&[("a", None), ("b", None)]);
        store.clear();
        assert!(store.is_empty());
    }
}
