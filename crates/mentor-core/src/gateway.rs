//! Remote API gateway trait.
//!
//! Defines the backend surface the session managers talk to. The concrete
//! HTTP implementation lives in `mentor-gateway`; tests substitute in-memory
//! mocks.

use crate::error::Result;
use crate::identity::Identity;
use crate::notification::{AccessScope, Notification, TargetLevel};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Username/password pair exchanged for a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Profile submitted on signup.
///
/// Accounts created through the client are always students; the backend
/// requires a level 1-4 for them. Administrator accounts are provisioned out
/// of band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupProfile {
    pub username: String,
    pub password: String,
    pub level: u8,
}

/// A source document chunk cited by an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub filename: String,
    #[serde(default)]
    pub page_number: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// The assistant's reply to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceDocument>,
}

/// An administrator document upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File name reported to the backend.
    pub file_name: String,
    /// Raw file content, sent as one multipart part.
    pub content: Vec<u8>,
    /// Who may retrieve the document through the assistant.
    pub access_scope: AccessScope,
    /// Optional announcement shown to students. When set, `notification_target`
    /// must be set too (backend rejects the upload otherwise).
    pub notification_message: Option<String>,
    pub notification_target: Option<TargetLevel>,
}

/// Backend outcome of an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub message: String,
    pub filename: String,
    #[serde(default)]
    pub doc_internal_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub notification_sent: bool,
}

/// The fixed backend HTTP surface consumed by the client.
///
/// One method per endpoint; no retry, no caching, no batching. Methods that
/// take a `token` attach it as a bearer header; `ask` accepts `None` because
/// guests may query too.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// `POST /auth/register`. Returns the created identity.
    async fn register(&self, profile: &SignupProfile) -> Result<Identity>;

    /// `POST /auth/login` (form-encoded password grant). Returns the bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String>;

    /// `GET /auth/me`. Resolves a bearer token to the current identity.
    async fn current_identity(&self, token: &str) -> Result<Identity>;

    /// `POST /query`. Asks the assistant one question.
    async fn ask(&self, query: &str, token: Option<&str>) -> Result<Answer>;

    /// `POST /admin/upload` (multipart).
    async fn upload(&self, request: &UploadRequest, token: &str) -> Result<UploadOutcome>;

    /// `POST /admin/broadcast`. Returns the backend status line.
    async fn broadcast(
        &self,
        message: &str,
        target_level: TargetLevel,
        token: &str,
    ) -> Result<String>;

    /// `GET /notifications`. `fetch_all = false` returns unseen only.
    async fn notifications(&self, fetch_all: bool, token: &str) -> Result<Vec<Notification>>;

    /// `POST /notifications/mark-as-seen`. The 204 response carries no body.
    async fn mark_notifications_seen(&self, ids: &[i64], token: &str) -> Result<()>;
}
