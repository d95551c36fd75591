//! Wire types for the backend HTTP surface.
//!
//! The backend is a FastAPI service: error responses carry a `detail` field
//! that is either a plain string (HTTPException) or an array of field-level
//! issues (request validation). Shapes follow
//! the service's published schemas.

use serde::{Deserialize, Serialize};

/// `POST /auth/register` request body.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub level: Option<u8>,
}

/// `POST /auth/login` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[allow(dead_code)]
    pub token_type: String,
}

/// `POST /query` request body.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub query: &'a str,
}

/// `POST /admin/broadcast` request body. The backend accepts "all" or an
/// integer; the integer encoding (0 = all) is used here.
#[derive(Debug, Serialize)]
pub(crate) struct BroadcastRequest<'a> {
    pub message: &'a str,
    pub target_level: i64,
}

/// `POST /admin/broadcast` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct BroadcastResponse {
    pub detail: String,
}

/// `POST /notifications/mark-as-seen` request body.
#[derive(Debug, Serialize)]
pub(crate) struct MarkSeenRequest<'a> {
    pub notification_ids: &'a [i64],
}

/// FastAPI error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub detail: ErrorDetail,
}

/// `detail` is a string for handler-raised errors and an issue array for
/// request validation failures.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

/// One entry of a 422 validation array.
#[derive(Debug, Deserialize)]
pub(crate) struct ValidationIssue {
    /// Location path, e.g. `["body", "username"]`; may contain array indices.
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
}

impl ValidationIssue {
    /// The offending field: the last string element of `loc`.
    pub fn field(&self) -> &str {
        self.loc
            .iter()
            .rev()
            .find_map(|v| v.as_str())
            .unwrap_or("body")
    }
}
