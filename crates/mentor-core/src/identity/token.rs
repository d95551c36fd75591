//! Token store trait.

use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for the bearer token.
///
/// The token lives under its own storage key, separate from the transcript;
/// there is no transactional coupling between the two. Implementations must
/// keep the token across process restarts so a login outlives one run of the
/// client.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the persisted token, if any.
    async fn load(&self) -> Result<Option<String>>;

    /// Persists the token, replacing any previous one.
    async fn save(&self, token: &str) -> Result<()>;

    /// Removes the persisted token. Idempotent.
    async fn clear(&self) -> Result<()>;
}
