//! Identity session manager.
//!
//! Owns the current-user object derived from the bearer token, and wraps the
//! authenticated backend operations (admin upload/broadcast, notifications).
//! Login and logout clear the chat transcript so one identity's conversation
//! never leaks into another's session.

use super::model::{AuthPhase, Identity};
use super::token::TokenStore;
use crate::chat::ChatSession;
use crate::error::{MentorError, Result};
use crate::gateway::{ApiGateway, Credentials, SignupProfile, UploadRequest};
use crate::notification::{Notification, TargetLevel};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Manages the authenticated identity for the current session.
///
/// State machine: `Unauthenticated -> Authenticating -> Authenticated`;
/// `logout` or a failed bootstrap returns to `Unauthenticated`. Admin-gated
/// operations are rejected here before any network traffic; the backend
/// still enforces the role on its side.
pub struct IdentitySession {
    identity: RwLock<Option<Identity>>,
    phase: RwLock<AuthPhase>,
    gateway: Arc<dyn ApiGateway>,
    tokens: Arc<dyn TokenStore>,
    chat: Arc<ChatSession>,
    /// Last fetched notification list; entries are removed optimistically
    /// when marked seen.
    notifications: RwLock<Vec<Notification>>,
}

impl IdentitySession {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        tokens: Arc<dyn TokenStore>,
        chat: Arc<ChatSession>,
    ) -> Self {
        Self {
            identity: RwLock::new(None),
            phase: RwLock::new(AuthPhase::Unauthenticated),
            gateway,
            tokens,
            chat,
            notifications: RwLock::new(Vec::new()),
        }
    }

    /// Returns the current identity, if authenticated.
    pub async fn identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    /// Returns the current phase of the identity lifecycle.
    pub async fn phase(&self) -> AuthPhase {
        *self.phase.read().await
    }

    /// The notification list as of the last fetch, minus optimistic removals.
    pub async fn cached_notifications(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }

    /// Resolves a previously stored token to an identity on startup.
    ///
    /// Best-effort: a missing token or an unreachable backend leaves the
    /// session unauthenticated without failing startup. A 401-class rejection
    /// means the token is stale and forces a local logout so it is not
    /// retried forever.
    pub async fn bootstrap(&self) -> Result<()> {
        let Some(token) = self.tokens.load().await? else {
            return Ok(());
        };

        self.set_phase(AuthPhase::Authenticating).await;
        match self.gateway.current_identity(&token).await {
            Ok(identity) => {
                tracing::info!(username = %identity.username, "session restored");
                *self.identity.write().await = Some(identity);
                self.set_phase(AuthPhase::Authenticated).await;
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!("stored token rejected, clearing session");
                self.logout().await
            }
            Err(e) => {
                // Backend unreachable; keep the token for a later retry.
                tracing::warn!("bootstrap failed, staying unauthenticated: {}", e);
                self.set_phase(AuthPhase::Unauthenticated).await;
                Ok(())
            }
        }
    }

    /// Exchanges credentials for a token and resolves the identity.
    ///
    /// Persists the token and clears the chat transcript before the identity
    /// fetch: a new identity always starts a fresh conversation.
    ///
    /// # Errors
    ///
    /// `MentorError::Authentication` when the backend rejects the
    /// credentials; the caller is responsible for user-facing messaging.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.set_phase(AuthPhase::Authenticating).await;

        let token = match self.gateway.login(credentials).await {
            Ok(token) => token,
            Err(e) => {
                self.set_phase(AuthPhase::Unauthenticated).await;
                return Err(e);
            }
        };

        self.tokens.save(&token).await?;
        self.chat.clear().await?;

        match self.gateway.current_identity(&token).await {
            Ok(identity) => {
                tracing::info!(username = %identity.username, "logged in");
                *self.identity.write().await = Some(identity);
                self.set_phase(AuthPhase::Authenticated).await;
                Ok(())
            }
            Err(e) => {
                self.set_phase(AuthPhase::Unauthenticated).await;
                Err(e)
            }
        }
    }

    /// Registers a new student account, then logs in with the same
    /// credentials.
    ///
    /// # Errors
    ///
    /// `MentorError::Validation` with field-level issues when the backend
    /// reports structured validation problems; otherwise the underlying
    /// request error.
    pub async fn signup(&self, profile: &SignupProfile) -> Result<()> {
        self.gateway.register(profile).await?;
        self.login(&Credentials::new(&profile.username, &profile.password))
            .await
    }

    /// Drops the token, transcript, identity, and cached notifications.
    ///
    /// Purely local; there is no server-side revocation call.
    pub async fn logout(&self) -> Result<()> {
        self.tokens.clear().await?;
        self.chat.clear().await?;
        *self.identity.write().await = None;
        self.notifications.write().await.clear();
        self.set_phase(AuthPhase::Unauthenticated).await;
        Ok(())
    }

    /// Uploads a document with its notification/access metadata.
    ///
    /// Administrator-only; returns the backend's human-readable status
    /// message.
    pub async fn upload_document(&self, request: &UploadRequest) -> Result<String> {
        let token = self.require_admin().await?;
        let outcome = self.gateway.upload(request, &token).await?;
        Ok(outcome.message)
    }

    /// Sends a broadcast notification to the given audience.
    ///
    /// Administrator-only; returns the backend's status line.
    pub async fn broadcast(&self, message: &str, target_level: TargetLevel) -> Result<String> {
        let token = self.require_admin().await?;
        self.gateway.broadcast(message, target_level, token.as_str()).await
    }

    /// Fetches notifications for the current user and caches them.
    ///
    /// `include_read = false` fetches unseen ones only.
    pub async fn notifications(&self, include_read: bool) -> Result<Vec<Notification>> {
        let token = self.require_token().await?;
        let list = self.gateway.notifications(include_read, &token).await?;
        *self.notifications.write().await = list.clone();
        Ok(list)
    }

    /// Marks the given notifications as seen.
    ///
    /// On a successful request the ids are removed from the local list
    /// regardless of the (empty) response body - an optimistic update that is
    /// never re-synced from the server.
    pub async fn mark_notifications_seen(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let token = self.require_token().await?;
        self.gateway.mark_notifications_seen(ids, &token).await?;

        self.notifications
            .write()
            .await
            .retain(|n| !ids.contains(&n.id));
        Ok(())
    }

    async fn set_phase(&self, phase: AuthPhase) {
        *self.phase.write().await = phase;
    }

    /// Returns the stored token or an Authentication error.
    async fn require_token(&self) -> Result<String> {
        self.tokens
            .load()
            .await?
            .ok_or_else(|| MentorError::authentication("not logged in"))
    }

    /// Rejects non-administrator callers before any network traffic.
    async fn require_admin(&self) -> Result<String> {
        let is_admin = self
            .identity
            .read()
            .await
            .as_ref()
            .is_some_and(Identity::is_admin);

        if !is_admin {
            return Err(MentorError::authorization(
                "administrator role required",
            ));
        }
        self.require_token().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatMessage, TranscriptStore};
    use crate::error::FieldIssue;
    use crate::gateway::{Answer, UploadOutcome};
    use crate::identity::Role;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryTranscriptStore {
        persisted: StdMutex<Option<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl TranscriptStore for MemoryTranscriptStore {
        async fn load(&self) -> Result<Option<Vec<ChatMessage>>> {
            Ok(self.persisted.lock().unwrap().clone())
        }

        async fn save(&self, messages: &[ChatMessage]) -> Result<()> {
            *self.persisted.lock().unwrap() = Some(messages.to_vec());
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            *self.persisted.lock().unwrap() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryTokenStore {
        token: StdMutex<Option<String>>,
    }

    impl MemoryTokenStore {
        fn with_token(token: &str) -> Self {
            Self {
                token: StdMutex::new(Some(token.to_string())),
            }
        }

        fn stored(&self) -> Option<String> {
            self.token.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TokenStore for MemoryTokenStore {
        async fn load(&self) -> Result<Option<String>> {
            Ok(self.stored())
        }

        async fn save(&self, token: &str) -> Result<()> {
            *self.token.lock().unwrap() = Some(token.to_string());
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            *self.token.lock().unwrap() = None;
            Ok(())
        }
    }

    /// Scripted gateway for identity tests.
    #[derive(Default)]
    struct ScriptedGateway {
        register_result: StdMutex<Option<Result<Identity>>>,
        login_result: StdMutex<Option<Result<String>>>,
        me_result: StdMutex<Option<Result<Identity>>>,
        notification_list: StdMutex<Vec<Notification>>,
        login_calls: AtomicUsize,
        upload_calls: AtomicUsize,
        broadcast_calls: AtomicUsize,
        seen_requests: StdMutex<Vec<Vec<i64>>>,
    }

    impl ScriptedGateway {
        fn student() -> Identity {
            Identity {
                username: "amina".to_string(),
                role: Role::Student,
                level: Some(2),
            }
        }

        fn admin() -> Identity {
            Identity {
                username: "staff".to_string(),
                role: Role::Admin,
                level: None,
            }
        }
    }

    #[async_trait]
    impl ApiGateway for ScriptedGateway {
        async fn register(&self, _profile: &SignupProfile) -> Result<Identity> {
            self.register_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Self::student()))
        }

        async fn login(&self, _credentials: &Credentials) -> Result<String> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            self.login_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok("token-1".to_string()))
        }

        async fn current_identity(&self, _token: &str) -> Result<Identity> {
            self.me_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Self::student()))
        }

        async fn ask(&self, query: &str, _token: Option<&str>) -> Result<Answer> {
            Ok(Answer {
                answer: format!("echo: {}", query),
                sources: Vec::new(),
            })
        }

        async fn upload(&self, _request: &UploadRequest, _token: &str) -> Result<UploadOutcome> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            Ok(UploadOutcome {
                message: "File uploaded and processed successfully.".to_string(),
                filename: "notes.pdf".to_string(),
                doc_internal_id: Some("doc-1".to_string()),
                error: None,
                notification_sent: false,
            })
        }

        async fn broadcast(
            &self,
            _message: &str,
            _target_level: TargetLevel,
            _token: &str,
        ) -> Result<String> {
            self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
            Ok("Broadcast message sent successfully.".to_string())
        }

        async fn notifications(&self, _fetch_all: bool, _token: &str) -> Result<Vec<Notification>> {
            Ok(self.notification_list.lock().unwrap().clone())
        }

        async fn mark_notifications_seen(&self, ids: &[i64], _token: &str) -> Result<()> {
            self.seen_requests.lock().unwrap().push(ids.to_vec());
            Ok(())
        }
    }

    struct Fixture {
        gateway: Arc<ScriptedGateway>,
        tokens: Arc<MemoryTokenStore>,
        chat: Arc<ChatSession>,
        identity: IdentitySession,
    }

    async fn fixture_with_tokens(tokens: MemoryTokenStore) -> Fixture {
        let gateway = Arc::new(ScriptedGateway::default());
        let tokens = Arc::new(tokens);
        let chat = Arc::new(
            ChatSession::load(
                Arc::new(MemoryTranscriptStore::default()),
                gateway.clone(),
                tokens.clone(),
            )
            .await,
        );
        let identity = IdentitySession::new(gateway.clone(), tokens.clone(), chat.clone());
        Fixture {
            gateway,
            tokens,
            chat,
            identity,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with_tokens(MemoryTokenStore::default()).await
    }

    fn notification(id: i64) -> Notification {
        Notification {
            id,
            message: format!("notification {}", id),
            target_level: TargetLevel::All,
            document_internal_id: None,
            timestamp: "2026-03-01T10:00:00Z".to_string(),
            is_seen: false,
        }
    }

    #[tokio::test]
    async fn test_login_persists_token_and_clears_transcript() {
        let f = fixture().await;
        // Guest conversation before login.
        f.chat.send_message("hello as guest").await.unwrap();
        assert!(!f.chat.transcript().await.is_empty());

        f.identity
            .login(&Credentials::new("amina", "secret"))
            .await
            .unwrap();

        assert_eq!(f.tokens.stored().as_deref(), Some("token-1"));
        assert!(f.chat.transcript().await.is_empty());
        assert_eq!(f.identity.phase().await, AuthPhase::Authenticated);
        assert_eq!(
            f.identity.identity().await.unwrap().username,
            "amina"
        );
    }

    #[tokio::test]
    async fn test_rejected_credentials_surface_as_authentication() {
        let f = fixture().await;
        *f.gateway.login_result.lock().unwrap() = Some(Err(MentorError::authentication(
            "Incorrect username or password",
        )));

        let err = f
            .identity
            .login(&Credentials::new("amina", "wrong"))
            .await
            .unwrap_err();

        assert!(err.is_authentication());
        assert_eq!(f.identity.phase().await, AuthPhase::Unauthenticated);
        assert!(f.identity.identity().await.is_none());
        assert!(f.tokens.stored().is_none());
    }

    #[tokio::test]
    async fn test_login_then_logout_resets_everything() {
        let f = fixture().await;
        f.identity
            .login(&Credentials::new("amina", "secret"))
            .await
            .unwrap();
        f.chat.send_message("what is FCDS?").await.unwrap();

        f.identity.logout().await.unwrap();

        assert!(f.identity.identity().await.is_none());
        assert_eq!(f.identity.phase().await, AuthPhase::Unauthenticated);
        assert!(f.chat.transcript().await.is_empty());
        assert!(f.tokens.stored().is_none());
    }

    #[tokio::test]
    async fn test_signup_logs_in_with_same_credentials() {
        let f = fixture().await;
        f.identity
            .signup(&SignupProfile {
                username: "amina".to_string(),
                password: "secret".to_string(),
                level: 2,
            })
            .await
            .unwrap();

        assert_eq!(f.gateway.login_calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.identity.phase().await, AuthPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_signup_validation_error_leaves_identity_unset() {
        let f = fixture().await;
        *f.gateway.register_result.lock().unwrap() = Some(Err(MentorError::Validation(vec![
            FieldIssue::new("username", "too short"),
        ])));

        let err = f
            .identity
            .signup(&SignupProfile {
                username: "ab".to_string(),
                password: "x".to_string(),
                level: 1,
            })
            .await
            .unwrap_err();

        let issues = err.field_issues().unwrap();
        assert_eq!(issues[0].field, "username");
        assert_eq!(issues[0].message, "too short");
        assert!(f.identity.identity().await.is_none());
        // Login is never attempted after a failed registration.
        assert_eq!(f.gateway.login_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_does_nothing() {
        let f = fixture().await;
        f.identity.bootstrap().await.unwrap();
        assert_eq!(f.identity.phase().await, AuthPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_bootstrap_restores_identity() {
        let f = fixture_with_tokens(MemoryTokenStore::with_token("stored-token")).await;
        f.identity.bootstrap().await.unwrap();

        assert_eq!(f.identity.phase().await, AuthPhase::Authenticated);
        assert_eq!(f.identity.identity().await.unwrap().username, "amina");
    }

    #[tokio::test]
    async fn test_bootstrap_clears_stale_token_on_401() {
        let f = fixture_with_tokens(MemoryTokenStore::with_token("stale-token")).await;
        *f.gateway.me_result.lock().unwrap() =
            Some(Err(MentorError::request(401, "token expired")));

        f.identity.bootstrap().await.unwrap();

        assert!(f.tokens.stored().is_none());
        assert!(f.identity.identity().await.is_none());
        assert_eq!(f.identity.phase().await, AuthPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_bootstrap_keeps_token_when_backend_unreachable() {
        let f = fixture_with_tokens(MemoryTokenStore::with_token("token-kept")).await;
        *f.gateway.me_result.lock().unwrap() =
            Some(Err(MentorError::transport("connection refused")));

        f.identity.bootstrap().await.unwrap();

        assert_eq!(f.tokens.stored().as_deref(), Some("token-kept"));
        assert!(f.identity.identity().await.is_none());
    }

    #[tokio::test]
    async fn test_admin_operations_rejected_for_students() {
        let f = fixture().await;
        f.identity
            .login(&Credentials::new("amina", "secret"))
            .await
            .unwrap();

        let upload = UploadRequest {
            file_name: "notes.pdf".to_string(),
            content: b"content".to_vec(),
            access_scope: crate::notification::AccessScope::AllStudents,
            notification_message: None,
            notification_target: None,
        };

        assert!(
            f.identity
                .upload_document(&upload)
                .await
                .unwrap_err()
                .is_authorization()
        );
        assert!(
            f.identity
                .broadcast("exam moved", TargetLevel::All)
                .await
                .unwrap_err()
                .is_authorization()
        );
        // Rejection happens before any network traffic.
        assert_eq!(f.gateway.upload_calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.gateway.broadcast_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_admin_upload_and_broadcast() {
        let f = fixture().await;
        *f.gateway.me_result.lock().unwrap() = Some(Ok(ScriptedGateway::admin()));
        f.identity
            .login(&Credentials::new("staff", "secret"))
            .await
            .unwrap();

        let upload = UploadRequest {
            file_name: "notes.pdf".to_string(),
            content: b"content".to_vec(),
            access_scope: crate::notification::AccessScope::Level2,
            notification_message: Some("New notes".to_string()),
            notification_target: Some(TargetLevel::Level(2)),
        };

        let message = f.identity.upload_document(&upload).await.unwrap();
        assert_eq!(message, "File uploaded and processed successfully.");

        let detail = f
            .identity
            .broadcast("exam moved", TargetLevel::Level(2))
            .await
            .unwrap();
        assert_eq!(detail, "Broadcast message sent successfully.");
    }

    #[tokio::test]
    async fn test_mark_seen_removes_locally_regardless_of_body() {
        let f = fixture().await;
        f.identity
            .login(&Credentials::new("amina", "secret"))
            .await
            .unwrap();
        *f.gateway.notification_list.lock().unwrap() =
            vec![notification(4), notification(5), notification(9)];

        let fetched = f.identity.notifications(false).await.unwrap();
        assert_eq!(fetched.len(), 3);

        f.identity.mark_notifications_seen(&[5]).await.unwrap();

        let remaining = f.identity.cached_notifications().await;
        let ids: Vec<i64> = remaining.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![4, 9]);
        assert_eq!(f.gateway.seen_requests.lock().unwrap().as_slice(), &[vec![5]]);
    }

    #[tokio::test]
    async fn test_mark_seen_with_no_ids_is_a_no_op() {
        let f = fixture().await;
        f.identity.mark_notifications_seen(&[]).await.unwrap();
        assert!(f.gateway.seen_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notifications_require_login() {
        let f = fixture().await;
        let err = f.identity.notifications(false).await.unwrap_err();
        assert!(err.is_authentication());
    }
}
