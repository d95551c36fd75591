//! Identity and authentication state types.

use serde::{Deserialize, Serialize};

/// User role as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

/// The authenticated user, as resolved from the bearer token via `/auth/me`.
///
/// `None` identity means the client is browsing as a guest; guests may still
/// ask questions but see no notifications and no admin screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
    /// Academic level 1-4; present for students only.
    #[serde(default)]
    pub level: Option<u8>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Lifecycle of the identity session.
///
/// `Unauthenticated -> Authenticating -> Authenticated`; logout or a failed
/// bootstrap returns to `Unauthenticated`. There is no "session expired"
/// state: an expired token surfaces as a request failure at the call site,
/// and a 401 during bootstrap forces a local logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Authenticating,
    Authenticated,
}
