//! Chat session: transcript model, persistence seam, manager, and reveal.

pub mod manager;
pub mod message;
pub mod reveal;
pub mod store;

pub use manager::ChatSession;
pub use message::{ChatMessage, Sender};
pub use store::TranscriptStore;
