//! HTTP implementation of the remote API gateway.
//!
//! A thin wrapper over `reqwest`: one method per backend endpoint, bearer
//! token attached when present, status codes mapped onto the client error
//! taxonomy. No retries, no caching.

use crate::dto::{
    ApiErrorBody, BroadcastRequest, BroadcastResponse, ErrorDetail, MarkSeenRequest, QueryRequest,
    RegisterRequest, TokenResponse,
};
use async_trait::async_trait;
use mentor_core::error::{FieldIssue, MentorError, Result};
use mentor_core::gateway::{
    Answer, ApiGateway, Credentials, SignupProfile, UploadOutcome, UploadRequest,
};
use mentor_core::identity::Identity;
use mentor_core::notification::{Notification, TargetLevel};
use reqwest::multipart;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Round-trip budget for auth/notification endpoints.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// The RAG pipeline and document embedding are slow; give them more room.
const LONG_TIMEOUT: Duration = Duration::from_secs(120);

/// Gateway over the fixed backend origin.
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpGateway {
    /// Creates a gateway for the given origin, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the round-trip budget for the short endpoints.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Budget for the slow endpoints (`/query`, `/admin/upload`).
    fn long_timeout(&self) -> Duration {
        self.request_timeout.max(LONG_TIMEOUT)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header("Authorization", format!("Bearer {}", token))
    }

    /// Passes successful responses through and maps everything else onto the
    /// error taxonomy.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, "backend rejected request");
        Err(map_error(status, &body))
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| MentorError::transport(e.to_string()))?;
        Self::check(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| MentorError::transport(format!("malformed response body: {}", e)))
    }
}

/// Maps a non-success backend response onto `MentorError`.
fn map_error(status: StatusCode, body: &str) -> MentorError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.detail);

    match detail {
        Some(ErrorDetail::Validation(issues)) => MentorError::Validation(
            issues
                .iter()
                .map(|issue| FieldIssue::new(issue.field(), &issue.msg))
                .collect(),
        ),
        Some(ErrorDetail::Message(message)) => match status {
            StatusCode::UNAUTHORIZED => MentorError::Authentication(message),
            StatusCode::FORBIDDEN => MentorError::Authorization(message),
            _ => MentorError::request(status.as_u16(), message),
        },
        None => {
            // Non-JSON body (proxy page, empty). Keep a short excerpt.
            let excerpt: String = body.chars().take(200).collect();
            match status {
                StatusCode::UNAUTHORIZED => MentorError::Authentication(excerpt),
                StatusCode::FORBIDDEN => MentorError::Authorization(excerpt),
                _ => MentorError::request(status.as_u16(), excerpt),
            }
        }
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn register(&self, profile: &SignupProfile) -> Result<Identity> {
        let body = RegisterRequest {
            username: &profile.username,
            password: &profile.password,
            // The client only ever creates student accounts.
            role: "student",
            level: Some(profile.level),
        };
        let response = Self::send(
            self.http
                .post(self.url("/auth/register"))
                .json(&body)
                .timeout(self.request_timeout),
        )
        .await?;
        Self::parse(response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<String> {
        // OAuth2 password grant, form-encoded, exactly as the backend's
        // token endpoint expects it.
        let form = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("scope", ""),
            ("client_id", "string"),
            ("client_secret", "string"),
        ];
        let response = Self::send(
            self.http
                .post(self.url("/auth/login"))
                .form(&form)
                .timeout(self.request_timeout),
        )
        .await?;
        let token: TokenResponse = Self::parse(response).await?;
        Ok(token.access_token)
    }

    async fn current_identity(&self, token: &str) -> Result<Identity> {
        let response = Self::send(
            Self::bearer(self.http.get(self.url("/auth/me")), token).timeout(self.request_timeout),
        )
        .await?;
        Self::parse(response).await
    }

    async fn ask(&self, query: &str, token: Option<&str>) -> Result<Answer> {
        let mut request = self
            .http
            .post(self.url("/query"))
            .json(&QueryRequest { query })
            .timeout(self.long_timeout());
        if let Some(token) = token {
            request = Self::bearer(request, token);
        }
        let response = Self::send(request).await?;
        Self::parse(response).await
    }

    async fn upload(&self, request: &UploadRequest, token: &str) -> Result<UploadOutcome> {
        let mime = mime_guess::from_path(&request.file_name)
            .first_or_octet_stream()
            .to_string();
        let part = multipart::Part::bytes(request.content.clone())
            .file_name(request.file_name.clone())
            .mime_str(&mime)
            .map_err(|e| MentorError::internal(format!("invalid mime type: {}", e)))?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("doc_access_target", request.access_scope.as_str());

        if let Some(message) = &request.notification_message {
            form = form.text("notification_message", message.clone());
            // The backend rejects a message without a target; send "all"
            // rather than let the upload bounce with a 422.
            let target = request.notification_target.unwrap_or(TargetLevel::All);
            form = form.text(
                "notification_target_level",
                match target {
                    TargetLevel::All => "all".to_string(),
                    TargetLevel::Level(level) => level.to_string(),
                },
            );
        }

        let response = Self::send(
            Self::bearer(self.http.post(self.url("/admin/upload")), token)
                .multipart(form)
                .timeout(self.long_timeout()),
        )
        .await?;
        Self::parse(response).await
    }

    async fn broadcast(
        &self,
        message: &str,
        target_level: TargetLevel,
        token: &str,
    ) -> Result<String> {
        let body = BroadcastRequest {
            message,
            target_level: target_level.as_backend_value(),
        };
        let response = Self::send(
            Self::bearer(self.http.post(self.url("/admin/broadcast")), token)
                .json(&body)
                .timeout(self.request_timeout),
        )
        .await?;
        let body: BroadcastResponse = Self::parse(response).await?;
        Ok(body.detail)
    }

    async fn notifications(&self, fetch_all: bool, token: &str) -> Result<Vec<Notification>> {
        let response = Self::send(
            Self::bearer(self.http.get(self.url("/notifications")), token)
                .query(&[("fetch_all", fetch_all)])
                .timeout(self.request_timeout),
        )
        .await?;
        Self::parse(response).await
    }

    async fn mark_notifications_seen(&self, ids: &[i64], token: &str) -> Result<()> {
        // 204 No Content on success; the body is never inspected.
        Self::send(
            Self::bearer(self.http.post(self.url("/notifications/mark-as-seen")), token)
                .json(&MarkSeenRequest {
                    notification_ids: ids,
                })
                .timeout(self.request_timeout),
        )
        .await?;
        Ok(())
    }
}
