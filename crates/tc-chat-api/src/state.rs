//! Shared application state for the Axum server.

use std::sync::Arc;

use crate::chat::ChatService;
use crate::config::ApiConfig;
use crate::dialogue::{self, DialogueEngine, DisabledEngine};
use crate::session::SessionStore;

/// Shared application state, cheap to clone into each handler.
#[derive(Clone)]
pub struct AppState {
    /// Turn orchestration (engine + sessions).
    pub chat: ChatService,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Create state around an explicit dialogue engine.
    pub fn new(engine: Arc<dyn DialogueEngine>) -> Self {
        Self {
            chat: ChatService::new(engine, SessionStore::new()),
            cors_origins: vec![],
        }
    }

    /// Create state with the engine and CORS policy from configuration.
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let engine = dialogue::build_engine(&config.dialogue)?;
        Ok(Self {
            cors_origins: config.cors_origins.clone(),
            ..Self::new(engine)
        })
    }

    /// Create state with no dialogue engine (tests and development).
    pub fn offline() -> Self {
        Self::new(Arc::new(DisabledEngine))
    }

    pub fn sessions(&self) -> &SessionStore {
        self.chat.sessions()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::offline()
    }
}
