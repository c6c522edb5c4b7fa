//! Chat session and message types for Parley.
//!
//! Sessions are owned by one account and hold an ordered list of messages.
//! Messages are append-only: created per turn, never mutated, deleted only
//! when their session is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Default title for a session before its first user message.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// A chat conversation owned by a single account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create an empty session owned by `account_id` with the default title.
    pub fn new(account_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            account_id,
            title: DEFAULT_SESSION_TITLE.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// A single message within a chat session.
///
/// `model_id` records which registry entry produced an assistant reply;
/// it is `None` for user messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub model_id: Option<Uuid>,
}

impl ChatMessage {
    /// Build a user message for a session.
    pub fn user(session_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::User,
            content,
            created_at: Utc::now(),
            model_id: None,
        }
    }

    /// Build an assistant message for a session, recording the model used.
    pub fn assistant(session_id: Uuid, content: String, model_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::Assistant,
            content,
            created_at: Utc::now(),
            model_id: Some(model_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_default_title() {
        let session = ChatSession::new(Uuid::now_v7());
        assert_eq!(session.title, "New Chat");
    }

    #[test]
    fn test_user_message_has_no_model() {
        let msg = ChatMessage::user(Uuid::now_v7(), "Hello".to_string());
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.model_id.is_none());
    }

    #[test]
    fn test_assistant_message_records_model() {
        let model_id = Uuid::now_v7();
        let msg = ChatMessage::assistant(Uuid::now_v7(), "Hi!".to_string(), model_id);
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.model_id, Some(model_id));
    }

    #[test]
    fn test_session_serialize() {
        let session = ChatSession::new(Uuid::now_v7());
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"title\":\"New Chat\""));
    }
}
