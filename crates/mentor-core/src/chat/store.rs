//! Transcript store trait.
//!
//! Defines the interface for transcript persistence operations.

use super::message::ChatMessage;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for the persisted chat transcript.
///
/// This trait defines the contract for mirroring the in-memory transcript,
/// decoupling the chat session from the specific storage mechanism
/// (e.g. a JSON file under the config directory, or an in-memory mock).
///
/// The transcript is written through in full after every mutation; there is
/// no partial update operation.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Loads the persisted transcript.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(messages))`: A transcript was found
    /// - `Ok(None)`: Nothing persisted yet
    /// - `Err(_)`: The stored copy could not be read or parsed
    async fn load(&self) -> Result<Option<Vec<ChatMessage>>>;

    /// Replaces the persisted transcript with the given messages.
    async fn save(&self, messages: &[ChatMessage]) -> Result<()>;

    /// Removes the persisted transcript entirely.
    ///
    /// Must succeed when nothing is persisted (idempotent).
    async fn clear(&self) -> Result<()>;
}
