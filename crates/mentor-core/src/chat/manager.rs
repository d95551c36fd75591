//! Chat session manager.
//!
//! Owns the in-memory transcript and orchestrates the
//! send -> await-response -> append -> reveal sequencing. Every mutation is
//! written through to the transcript store in full.

use super::message::{ChatMessage, Sender};
use super::store::TranscriptStore;
use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::identity::TokenStore;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Manages the chat transcript for the current session.
///
/// `ChatSession` is responsible for:
/// - Loading the persisted transcript on startup
/// - Appending the user's message optimistically before the request is sent
/// - Appending the assistant's answer with the reveal still pending
/// - Writing the full transcript through to storage after every mutation
/// - Clearing the transcript when the identity changes
///
/// Overlapping sends are queued: the user message is appended the moment
/// `send_message` is called, but the network round-trip runs under a send
/// permit, so answers are appended in request-issue order even when callers
/// do not await one send before issuing the next.
pub struct ChatSession {
    /// The in-memory transcript; append order is conversation order.
    transcript: RwLock<Vec<ChatMessage>>,
    /// Write-through persistence for the transcript.
    store: Arc<dyn TranscriptStore>,
    /// Backend gateway used for `POST /query`.
    gateway: Arc<dyn ApiGateway>,
    /// Bearer token source; `ask` runs unauthenticated when no token is stored.
    tokens: Arc<dyn TokenStore>,
    /// Serializes the network leg of overlapping sends.
    send_permit: Mutex<()>,
}

impl ChatSession {
    /// Creates a session, restoring the persisted transcript when possible.
    ///
    /// A missing or unparsable stored transcript yields an empty one; a
    /// corrupt file is logged and never fatal.
    pub async fn load(
        store: Arc<dyn TranscriptStore>,
        gateway: Arc<dyn ApiGateway>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let transcript = match store.load().await {
            Ok(Some(messages)) => messages,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("discarding unreadable transcript: {}", e);
                Vec::new()
            }
        };

        Self {
            transcript: RwLock::new(transcript),
            store,
            gateway,
            tokens,
            send_permit: Mutex::new(()),
        }
    }

    /// Returns a snapshot of the current transcript.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.read().await.clone()
    }

    /// Sends one question to the assistant.
    ///
    /// The user message is appended (and persisted) immediately; on success
    /// the assistant message is appended with `reveal_pending = true` and the
    /// updated transcript is returned. On failure the error propagates and
    /// the user message stays in place - no rollback, no retry.
    ///
    /// # Errors
    ///
    /// Returns the gateway error as-is, or a storage error if the
    /// write-through fails.
    pub async fn send_message(&self, query: &str) -> Result<Vec<ChatMessage>> {
        self.append(ChatMessage::user(query)).await?;

        let token = match self.tokens.load().await {
            Ok(token) => token,
            Err(e) => {
                // A broken token store must not block guest queries.
                tracing::warn!("token store unreadable, asking as guest: {}", e);
                None
            }
        };

        // Queue overlapping sends so answers land in request-issue order.
        let _permit = self.send_permit.lock().await;
        let answer = self.gateway.ask(query, token.as_deref()).await?;
        self.append(ChatMessage::assistant(answer.answer)).await?;

        Ok(self.transcript().await)
    }

    /// Marks the reveal of an assistant message as finished.
    ///
    /// Flips `reveal_pending` to false and persists. Calling it again for the
    /// same message (or for an unknown id) is a no-op, so a re-triggered
    /// reveal can never double-complete.
    pub async fn mark_reveal_complete(&self, message_id: Uuid) -> Result<()> {
        let snapshot = {
            let mut transcript = self.transcript.write().await;
            let flipped = transcript
                .iter_mut()
                .find(|m| m.id == message_id && m.sender == Sender::Assistant && m.reveal_pending)
                .map(|m| m.reveal_pending = false)
                .is_some();

            if !flipped {
                tracing::debug!("no pending reveal for message {}", message_id);
                return Ok(());
            }
            transcript.clone()
        };

        self.store.save(&snapshot).await
    }

    /// Empties the transcript and removes the persisted copy.
    ///
    /// Invoked on login and logout so one identity's conversation never leaks
    /// into another's session. Idempotent.
    pub async fn clear(&self) -> Result<()> {
        self.transcript.write().await.clear();
        self.store.clear().await
    }

    /// Appends a message and writes the transcript through to storage.
    async fn append(&self, message: ChatMessage) -> Result<()> {
        let snapshot = {
            let mut transcript = self.transcript.write().await;
            transcript.push(message);
            transcript.clone()
        };
        self.store.save(&snapshot).await
    }
}
