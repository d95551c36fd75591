//! File-backed persistence for the FCDS Mentor client.
//!
//! Implements the `TokenStore` and `TranscriptStore` seams from
//! `mentor-core` on top of an atomic JSON file primitive, and owns the
//! client configuration file and path layout.

pub mod config_storage;
pub mod paths;
pub mod storage;
pub mod token_store;
pub mod transcript_store;

pub use config_storage::{ClientConfig, ConfigStorage, SERVER_URL_ENV};
pub use paths::{MentorPaths, PathError};
pub use token_store::FileTokenStore;
pub use transcript_store::FileTranscriptStore;
