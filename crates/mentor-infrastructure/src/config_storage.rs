//! Client configuration loaded from `~/.config/fcds-mentor/config.toml`.

use std::fs;
use std::path::PathBuf;

use mentor_core::{MentorError, Result};
use serde::{Deserialize, Serialize};

use crate::paths::MentorPaths;

/// Environment variable that overrides the configured backend origin.
pub const SERVER_URL_ENV: &str = "MENTOR_SERVER_URL";

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client settings persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Origin of the backend API, without a trailing slash.
    pub server_url: String,
    /// Round-trip budget for the short backend endpoints, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Loads and saves the client configuration file.
///
/// The file is created with default contents on first load so users can
/// discover and edit it. `MENTOR_SERVER_URL` takes precedence over the
/// file when set.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(paths: &MentorPaths) -> Self {
        Self {
            path: paths.config_file(),
        }
    }

    /// Loads the configuration, writing the default file if none exists.
    pub fn load_or_init(&self) -> Result<ClientConfig> {
        let mut config = if self.path.exists() {
            let contents = fs::read_to_string(&self.path)?;
            toml::from_str(&contents)?
        } else {
            let config = ClientConfig::default();
            self.save(&config)?;
            tracing::info!(path = %self.path.display(), "wrote default configuration");
            config
        };

        if let Ok(url) = std::env::var(SERVER_URL_ENV)
            && !url.trim().is_empty()
        {
            config.server_url = url;
        }

        Ok(config)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(config)
            .map_err(|e| MentorError::config(format!("cannot serialize config: {}", e)))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
