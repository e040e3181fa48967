//! Message domain types.
//!
//! A `Message` is the core value object that flows through the pipeline:
//! the user sends one, the orchestrator records it, gathers context around
//! it, and records the assistant's reply next to it. Messages are immutable
//! once created and owned exclusively by the session that contains them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The assistant reply (plugin output or generated fallback)
    Assistant,
    /// System instructions
    System,
}

impl Role {
    /// Uppercase label used when rendering conversation history into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
            Role::System => "SYSTEM",
        }
    }
}

/// A single message in a session's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello there");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello there");
    }

    #[test]
    fn role_labels() {
        assert_eq!(Role::User.label(), "USER");
        assert_eq!(Role::Assistant.label(), "ASSISTANT");
        assert_eq!(Role::System.label(), "SYSTEM");
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::assistant("Reply text");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"assistant\""));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content, "Reply text");
        assert_eq!(back.role, Role::Assistant);
    }
}
