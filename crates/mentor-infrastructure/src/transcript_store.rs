//! File-backed chat transcript persistence.

use async_trait::async_trait;
use mentor_core::chat::{ChatMessage, TranscriptStore};
use mentor_core::{MentorError, Result};

use crate::paths::MentorPaths;
use crate::storage::AtomicJsonFile;

/// Persists the transcript as a JSON array in `transcript.json` under the
/// config directory. Every save writes the full snapshot.
pub struct FileTranscriptStore {
    file: AtomicJsonFile<Vec<ChatMessage>>,
}

impl FileTranscriptStore {
    pub fn new(paths: &MentorPaths) -> Self {
        Self {
            file: AtomicJsonFile::new(paths.transcript_file()),
        }
    }
}

#[async_trait]
impl TranscriptStore for FileTranscriptStore {
    async fn load(&self) -> Result<Option<Vec<ChatMessage>>> {
        let file = self.file.clone();
        let messages = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| MentorError::internal(format!("transcript load task failed: {}", e)))??;
        Ok(messages)
    }

    async fn save(&self, messages: &[ChatMessage]) -> Result<()> {
        let file = self.file.clone();
        let snapshot = messages.to_vec();
        tokio::task::spawn_blocking(move || file.save(&snapshot))
            .await
            .map_err(|e| MentorError::internal(format!("transcript save task failed: {}", e)))??;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.remove())
            .await
            .map_err(|e| MentorError::internal(format!("transcript clear task failed: {}", e)))??;
        Ok(())
    }
}
