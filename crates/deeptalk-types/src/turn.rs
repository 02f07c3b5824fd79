//! Conversation turn types.
//!
//! A [`Turn`] is one message in the conversation history. It is modeled as
//! a sum type so that an assistant turn is the only place a reasoning
//! trace can live -- a user turn cannot carry one by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// One message in the conversation.
///
/// Assistant turns hold the visible answer and, separately, the reasoning
/// trace captured from the delimited span of the stream. The reasoning is
/// archived and shown on demand but never resent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    User {
        visible: String,
    },
    Assistant {
        visible: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reasoning: Option<String>,
    },
}

impl Turn {
    /// Who authored this turn.
    pub fn role(&self) -> Role {
        match self {
            Turn::User { .. } => Role::User,
            Turn::Assistant { .. } => Role::Assistant,
        }
    }

    /// The displayed (and transmitted) text of this turn.
    pub fn visible(&self) -> &str {
        match self {
            Turn::User { visible } => visible,
            Turn::Assistant { visible, .. } => visible,
        }
    }

    /// The reasoning trace, present only on assistant turns that had one.
    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Turn::User { .. } => None,
            Turn::Assistant { reasoning, .. } => reasoning.as_deref(),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Turn::User { .. })
    }

    pub fn is_assistant(&self) -> bool {
        matches!(self, Turn::Assistant { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_roundtrip() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("ASSISTANT".parse::<Role>().unwrap(), Role::Assistant);
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_turn_has_no_reasoning() {
        let turn = Turn::User {
            visible: "hello".to_string(),
        };
        assert_eq!(turn.role(), Role::User);
        assert_eq!(turn.visible(), "hello");
        assert!(turn.reasoning().is_none());
    }

    #[test]
    fn test_assistant_turn_carries_reasoning() {
        let turn = Turn::Assistant {
            visible: "42".to_string(),
            reasoning: Some("let me think".to_string()),
        };
        assert!(turn.is_assistant());
        assert_eq!(turn.visible(), "42");
        assert_eq!(turn.reasoning(), Some("let me think"));
    }

    #[test]
    fn test_turn_serde_tags_by_role() {
        let turn = Turn::Assistant {
            visible: "hi".to_string(),
            reasoning: None,
        };
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
        // Absent reasoning is omitted from the wire form entirely.
        assert!(!json.contains("reasoning"));

        let parsed: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, turn);
    }
}
