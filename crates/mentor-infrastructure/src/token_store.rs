//! File-backed bearer token persistence.

use async_trait::async_trait;
use chrono::Utc;
use mentor_core::identity::TokenStore;
use mentor_core::{MentorError, Result};
use serde::{Deserialize, Serialize};

use crate::paths::MentorPaths;
use crate::storage::AtomicJsonFile;

/// On-disk shape of the persisted token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
    saved_at: String,
}

/// Keeps the bearer token in `token.json` under the config directory so a
/// session survives client restarts.
pub struct FileTokenStore {
    file: AtomicJsonFile<StoredToken>,
}

impl FileTokenStore {
    pub fn new(paths: &MentorPaths) -> Self {
        Self {
            file: AtomicJsonFile::new(paths.token_file()),
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        let file = self.file.clone();
        let stored = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| MentorError::internal(format!("token load task failed: {}", e)))??;
        Ok(stored.map(|t| t.access_token))
    }

    async fn save(&self, token: &str) -> Result<()> {
        let file = self.file.clone();
        let stored = StoredToken {
            access_token: token.to_string(),
            saved_at: Utc::now().to_rfc3339(),
        };
        tokio::task::spawn_blocking(move || file.save(&stored))
            .await
            .map_err(|e| MentorError::internal(format!("token save task failed: {}", e)))??;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.remove())
            .await
            .map_err(|e| MentorError::internal(format!("token clear task failed: {}", e)))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileTokenStore {
        let paths = MentorPaths::with_root(PathBuf::from(dir.path()));
        FileTokenStore::new(&paths)
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("tok-123").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("tok-123".to_string()));
    }

    #[tokio::test]
    async fn test_load_without_saved_token() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_removes_token() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("tok-123").await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        // Clearing again is fine.
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_token() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("old").await.unwrap();
        store.save("new").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("new".to_string()));
    }
}
