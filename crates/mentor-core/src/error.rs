//! Error types for the Mentor client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation issue reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// The offending field name (e.g. `username`).
    pub field: String,
    /// Human-readable message for that field.
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A shared error type for the entire Mentor client.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The first four variants are
/// the wire-facing taxonomy: bad credentials, field-level signup issues,
/// role-gated actions, and everything else the backend or transport can fail
/// with.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum MentorError {
    /// Credentials were rejected by the backend
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Field-level validation issues (signup, upload metadata)
    #[error("Validation failed ({} field(s))", .0.len())]
    Validation(Vec<FieldIssue>),

    /// A role-gated action was attempted by the wrong role
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Generic network or backend failure
    #[error("Request failed: {message}")]
    Request {
        /// HTTP status, when the backend answered at all
        status: Option<u16>,
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", etc.
        message: String,
    },

    /// Storage layer error (persistent session store)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MentorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates an Authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    /// Creates a Request error without an HTTP status (transport failure)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Request {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Request error carrying the backend status code
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an Authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }

    /// Check if this error indicates the bearer token was rejected.
    ///
    /// Returns true for:
    /// - `Authentication` errors
    /// - `Request` errors with a 401 status
    ///
    /// Used by the identity manager to decide whether a failed bootstrap
    /// should clear the stored token.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Authentication(_) => true,
            Self::Request {
                status: Some(401), ..
            } => true,
            _ => false,
        }
    }

    /// Returns the field-level issues when this is a Validation error.
    pub fn field_issues(&self) -> Option<&[FieldIssue]> {
        match self {
            Self::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MentorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MentorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MentorError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (boundary with the CLI)
impl From<anyhow::Error> for MentorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for MentorError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, MentorError>`.
pub type Result<T> = std::result::Result<T, MentorError>;
