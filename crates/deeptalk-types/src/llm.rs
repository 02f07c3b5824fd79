//! Wire types for the OpenAI-compatible chat completion endpoint.
//!
//! These are the shapes that cross the transport boundary: the outgoing
//! request payload and the per-message `{role, content}` pairs inside it.
//! They are distinct from [`crate::turn::Turn`], which is the stored form
//! -- projection from one to the other (with reasoning redacted) is the
//! context assembler's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::turn::Role;

/// Role of a message in an outgoing payload.
///
/// The wire vocabulary is wider than the stored one: a `system` message
/// may be prepended to steer reasoning generation, but is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

/// A single `{role, content}` pair in an outgoing payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Serialized size of this message as it will appear on the wire.
    ///
    /// This is the unit the context budget is measured in.
    pub fn serialized_len(&self) -> usize {
        serde_json::to_string(self).map_or(0, |s| s.len())
    }
}

/// Request body for a streaming chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub top_p: f64,
    pub stream: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_display_roundtrip() {
        for (role, s) in [
            (MessageRole::System, "system"),
            (MessageRole::User, "user"),
            (MessageRole::Assistant, "assistant"),
        ] {
            assert_eq!(role.to_string(), s);
            assert_eq!(s.parse::<MessageRole>().unwrap(), role);
        }
        assert!("tool".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_request_serializes_streaming_payload() {
        let request = CompletionRequest {
            model: "deepseek-reasoner".to_string(),
            messages: vec![Message::new(MessageRole::User, "hi")],
            temperature: 0.6,
            top_p: 0.95,
            stream: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "deepseek-reasoner");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_serialized_len_matches_json_encoding() {
        let msg = Message::new(MessageRole::User, "hello");
        let expected = serde_json::to_string(&msg).unwrap().len();
        assert_eq!(msg.serialized_len(), expected);
    }
}
