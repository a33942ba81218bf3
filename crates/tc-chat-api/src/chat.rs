//! Chat orchestration — one user turn from text to response.
//!
//! Validates the text, asks the dialogue engine, extracts the two fields
//! (regex fallback included), merges them into the caller's session and
//! rotates the session once a topology can be created.

use std::sync::Arc;

use tc_protocol::{ChatRequest, ChatResponse};

use crate::dialogue::{DialogueEngine, EngineReply};
use crate::error::{ApiError, ApiResult, EMPTY_INPUT_MESSAGE};
use crate::extract::extract;
use crate::session::SessionStore;

/// Reply used when the engine has nothing to say.
pub const DEFAULT_REPLY: &str = "Message received.";

/// Composes the dialogue engine, extractor and session store.
#[derive(Clone)]
pub struct ChatService {
    engine: Arc<dyn DialogueEngine>,
    sessions: SessionStore,
}

impl ChatService {
    pub fn new(engine: Arc<dyn DialogueEngine>, sessions: SessionStore) -> Self {
        Self { engine, sessions }
    }

    pub fn engine(&self) -> &Arc<dyn DialogueEngine> {
        &self.engine
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one chat turn.
    ///
    /// Blank text is rejected before any session is touched. The turn itself
    /// runs on its own task so a fault inside it surfaces as
    /// `ApiError::Internal` with the session left as it was.
    pub async fn handle(&self, request: ChatRequest) -> ApiResult<ChatResponse> {
        let text = request.message.trim().to_string();
        if text.is_empty() {
            return Err(ApiError::BadRequest(EMPTY_INPUT_MESSAGE.into()));
        }

        let service = self.clone();
        tokio::spawn(async move { service.run_turn(text, request.session_id).await })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat turn failed");
                ApiError::Internal(format!("chat turn failed: {e}"))
            })
    }

    async fn run_turn(&self, text: String, session_key: Option<String>) -> ChatResponse {
        let mut session = self.sessions.lock(session_key.as_deref()).await;

        let reply = match self.engine.converse(&session.id, &text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backend = self.engine.backend_name(),
                    "dialogue engine unavailable, using text fallback"
                );
                EngineReply::default()
            }
        };

        let extracted = extract(&text, &reply.entities);
        let merged = session.merge(&extracted);
        let data = merged.data();
        let ready_to_create = merged.is_complete();

        tracing::debug!(
            session_id = %session.id,
            topology = ?data.topology,
            devices = ?data.devices,
            state = ?merged.state(),
            "turn merged"
        );

        self.sessions.commit(&mut session, merged).await;
        let next_session = if ready_to_create {
            self.sessions.retire(&mut session).await
        } else {
            session.id.clone()
        };

        ChatResponse {
            success: true,
            message: reply.reply.unwrap_or_else(|| DEFAULT_REPLY.to_string()),
            ready_to_create,
            session_id: Some(next_session),
            data,
        }
    }
}
