//! Identity session: user model, token persistence seam, and manager.

pub mod manager;
pub mod model;
pub mod token;

pub use manager::IdentitySession;
pub use model::{AuthPhase, Identity, Role};
pub use token::TokenStore;
