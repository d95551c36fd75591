//! Unified path management for the client's persisted files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/fcds-mentor/       # Config directory
//! ├── config.toml              # Backend origin and client settings
//! ├── token.json               # Bearer token (survives restarts)
//! └── transcript.json          # Chat transcript (cleared on login/logout)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for mentor_core::MentorError {
    fn from(e: PathError) -> Self {
        mentor_core::MentorError::config(e.to_string())
    }
}

/// Resolves the locations of the client's persisted files.
#[derive(Debug, Clone)]
pub struct MentorPaths {
    config_dir: PathBuf,
}

impl MentorPaths {
    /// Uses the platform config directory (e.g. `~/.config/fcds-mentor/`).
    pub fn new() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir()
            .ok_or(PathError::HomeDirNotFound)?
            .join("fcds-mentor");
        Ok(Self { config_dir })
    }

    /// Uses a custom root directory (for tests).
    pub fn with_root(root: PathBuf) -> Self {
        Self { config_dir: root }
    }

    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    /// `config.toml` - backend origin and client settings.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// `token.json` - the bearer token.
    pub fn token_file(&self) -> PathBuf {
        self.config_dir.join("token.json")
    }

    /// `transcript.json` - the persisted chat transcript.
    pub fn transcript_file(&self) -> PathBuf {
        self.config_dir.join("transcript.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_the_root() {
        let paths = MentorPaths::with_root(PathBuf::from("/tmp/mentor-test"));
        assert_eq!(
            paths.token_file(),
            PathBuf::from("/tmp/mentor-test/token.json")
        );
        assert_eq!(
            paths.transcript_file(),
            PathBuf::from("/tmp/mentor-test/transcript.json")
        );
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/mentor-test/config.toml")
        );
    }
}
