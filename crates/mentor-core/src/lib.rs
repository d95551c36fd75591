//! Core domain of the FCDS Mentor client.
//!
//! This crate owns the two session managers (chat and identity), the
//! transcript and notification models, and the trait seams the other crates
//! plug into: `ApiGateway` (implemented by `mentor-gateway` over HTTP),
//! `TranscriptStore` and `TokenStore` (implemented by
//! `mentor-infrastructure` over atomic JSON files).

pub mod chat;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod notification;

// Re-export common error type
pub use error::{MentorError, Result};
