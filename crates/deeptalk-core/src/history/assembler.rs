//! Projection of the turn store into an outgoing payload.
//!
//! Reasoning is redacted unconditionally -- it is archived locally but
//! never resent to the model. The projected sequence is then fitted to the
//! context budget by evicting the oldest messages first. Eviction is
//! visible only in the transmitted payload; the store itself is never
//! mutated here.

use deeptalk_types::llm::{Message, MessageRole};
use tracing::debug;

use super::store::TurnStore;

/// Result of projecting the store against a byte budget.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    /// Messages to transmit, oldest first.
    pub messages: Vec<Message>,
    /// Projected messages dropped to fit the budget, oldest first.
    pub evicted: Vec<Message>,
}

/// Project the store to `{role, content}` pairs and fit them to `budget`
/// bytes.
///
/// The size estimate is the summed JSON encoding length of each message.
/// Eviction is strictly FIFO by turn order and never removes the most
/// recent message, even if that single message alone exceeds the budget --
/// at least one message is always sent.
pub fn assemble(store: &TurnStore, budget: usize) -> AssembledContext {
    let mut messages: Vec<Message> = store
        .turns()
        .iter()
        .map(|turn| Message::new(MessageRole::from(turn.role()), turn.visible()))
        .collect();

    let mut total: usize = messages.iter().map(Message::serialized_len).sum();
    let mut evicted = Vec::new();

    while total > budget && messages.len() > 1 {
        let oldest = messages.remove(0);
        total -= oldest.serialized_len();
        evicted.push(oldest);
    }

    if !evicted.is_empty() {
        debug!(
            evicted = evicted.len(),
            retained = messages.len(),
            estimate = total,
            budget,
            "evicted oldest messages to fit context budget"
        );
    }

    AssembledContext { messages, evicted }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(texts: &[&str]) -> TurnStore {
        let mut store = TurnStore::new();
        for (i, text) in texts.iter().enumerate() {
            if i % 2 == 0 {
                store.push_user(*text);
            } else {
                store.push_assistant(*text, Some("secret reasoning".to_string()));
            }
        }
        store
    }

    #[test]
    fn test_reasoning_is_always_redacted() {
        let store = store_of(&["question", "answer"]);
        let ctx = assemble(&store, usize::MAX);
        assert_eq!(ctx.messages.len(), 2);
        assert_eq!(ctx.messages[1].content, "answer");
        let serialized = serde_json::to_string(&ctx.messages).unwrap();
        assert!(!serialized.contains("secret reasoning"));
    }

    #[test]
    fn test_roles_project_to_wire_vocabulary() {
        let store = store_of(&["q", "a"]);
        let ctx = assemble(&store, usize::MAX);
        assert_eq!(ctx.messages[0].role, MessageRole::User);
        assert_eq!(ctx.messages[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_eviction_is_fifo_oldest_first() {
        let store = store_of(&["first question", "first answer", "second question"]);
        let one_msg_budget = Message::new(MessageRole::User, "second question").serialized_len();
        let ctx = assemble(&store, one_msg_budget);

        assert_eq!(ctx.messages.len(), 1);
        assert_eq!(ctx.messages[0].content, "second question");
        assert_eq!(ctx.evicted.len(), 2);
        assert_eq!(ctx.evicted[0].content, "first question");
        assert_eq!(ctx.evicted[1].content, "first answer");
    }

    #[test]
    fn test_most_recent_message_survives_even_over_budget() {
        let store = store_of(&["short", "a very long answer that cannot possibly fit"]);
        let ctx = assemble(&store, 1);
        assert_eq!(ctx.messages.len(), 1);
        assert_eq!(
            ctx.messages[0].content,
            "a very long answer that cannot possibly fit"
        );
    }

    #[test]
    fn test_within_budget_keeps_everything() {
        let store = store_of(&["q1", "a1", "q2", "a2"]);
        let ctx = assemble(&store, 32_768);
        assert_eq!(ctx.messages.len(), 4);
        assert!(ctx.evicted.is_empty());
    }

    #[test]
    fn test_empty_store_assembles_empty_payload() {
        let ctx = assemble(&TurnStore::new(), 1024);
        assert!(ctx.messages.is_empty());
        assert!(ctx.evicted.is_empty());
    }

    #[test]
    fn test_assembly_does_not_mutate_store() {
        let store = store_of(&["q1", "a1", "q2"]);
        let _ = assemble(&store, 1);
        assert_eq!(store.len(), 3);
    }
}
