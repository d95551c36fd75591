//! Chat transcript message types.
//!
//! A transcript is an ordered `Vec<ChatMessage>`; append order is the
//! conversation order and is never re-sorted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the sender of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Answer returned by the assistant.
    Assistant,
}

/// A single message in the chat transcript.
///
/// Assistant messages are created with `reveal_pending = true` and flipped
/// false exactly once, after the character-by-character reveal finishes.
/// User messages never have a pending reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Correlation id, unique per message.
    pub id: Uuid,
    /// Who produced the message.
    pub sender: Sender,
    /// The message content.
    pub text: String,
    /// Timestamp when the message was created (RFC 3339).
    pub created_at: String,
    /// True while the reveal animation for this message has not finished.
    pub reveal_pending: bool,
}

impl ChatMessage {
    /// Creates a user message. Users' messages need no reveal.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            text: text.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            reveal_pending: false,
        }
    }

    /// Creates an assistant message with the reveal still pending.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Assistant,
            text: text.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            reveal_pending: true,
        }
    }
}
