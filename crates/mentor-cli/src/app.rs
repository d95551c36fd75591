//! Application context shared by every subcommand.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use mentor_core::chat::ChatSession;
use mentor_core::identity::IdentitySession;
use mentor_gateway::HttpGateway;
use mentor_infrastructure::{
    ClientConfig, ConfigStorage, FileTokenStore, FileTranscriptStore, MentorPaths,
};

/// Wired-up session managers over the real gateway and file stores.
///
/// Everything is injected explicitly here; nothing else in the workspace
/// reaches for global state.
pub struct App {
    pub chat: Arc<ChatSession>,
    pub identity: Arc<IdentitySession>,
    pub config: ClientConfig,
}

impl App {
    /// Loads configuration, restores the persisted transcript, and resolves
    /// any stored token to an identity.
    pub async fn init() -> Result<Self> {
        let paths = MentorPaths::new()?;
        let config = ConfigStorage::new(&paths).load_or_init()?;

        let gateway = Arc::new(
            HttpGateway::new(&config.server_url)
                .with_request_timeout(Duration::from_secs(config.request_timeout_secs)),
        );
        let tokens = Arc::new(FileTokenStore::new(&paths));
        let transcripts = Arc::new(FileTranscriptStore::new(&paths));

        let chat = Arc::new(
            ChatSession::load(transcripts, gateway.clone(), tokens.clone()).await,
        );
        let identity = Arc::new(IdentitySession::new(gateway, tokens, chat.clone()));

        identity.bootstrap().await?;

        Ok(Self {
            chat,
            identity,
            config,
        })
    }
}
