//! Dialogue engine adapters.
//!
//! Sends user text to a Rasa-compatible engine and returns its reply text
//! plus any entities or slots it filled. Two deployment strategies:
//! - **Parse**: `/model/parse` for entities, optional webhook reply.
//! - **Tracker**: webhook reply, then the per-sender tracker for slots.
//!
//! Adapters report failures as `DialogueError`; the chat orchestrator decides
//! to degrade to the regex fallback.

pub mod disabled;
pub mod parse;
pub mod tracker;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tc_protocol::{BotMessage, EngineEntity, EngineStatus, WebhookRequest};

use crate::config::{DialogueConfig, DialogueMode};

pub use disabled::DisabledEngine;
pub use parse::ParseEngine;
pub use tracker::TrackerEngine;

/// What the engine produced for one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineReply {
    /// First bot utterance, if any.
    pub reply: Option<String>,
    /// Entities (parse) or filled slots (tracker).
    pub entities: Vec<EngineEntity>,
}

/// Why the engine could not be used for this turn.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("dialogue engine unavailable: {0}")]
    Unavailable(String),

    #[error("dialogue engine timed out")]
    Timeout,

    #[error("dialogue engine returned status {0}")]
    Status(u16),

    #[error("invalid dialogue engine response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DialogueError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DialogueError::Timeout
        } else if e.is_decode() {
            DialogueError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            DialogueError::Status(status.as_u16())
        } else {
            DialogueError::Unavailable(e.to_string())
        }
    }
}

/// Trait for dialogue engines that turn user text into a reply and entities.
#[async_trait]
pub trait DialogueEngine: Send + Sync {
    /// Run one turn for `sender`.
    async fn converse(&self, sender: &str, text: &str) -> Result<EngineReply, DialogueError>;

    /// Best-effort probe of whether the engine is loaded and reachable.
    async fn healthy(&self) -> bool;

    /// Key under which `/health` reports `healthy()`.
    fn health_key(&self) -> &str;

    /// Name of this strategy (for logging).
    fn backend_name(&self) -> &str;
}

/// Build the engine selected by configuration.
pub fn build_engine(config: &DialogueConfig) -> anyhow::Result<Arc<dyn DialogueEngine>> {
    let engine: Arc<dyn DialogueEngine> = match config.mode {
        DialogueMode::Parse => Arc::new(ParseEngine::new(
            EngineClient::new(config)?,
            config.generate_reply,
        )),
        DialogueMode::Tracker => Arc::new(TrackerEngine::new(EngineClient::new(config)?)),
        DialogueMode::Disabled => Arc::new(DisabledEngine),
    };
    Ok(engine)
}

/// Thin JSON-over-HTTP client shared by the strategies.
#[derive(Debug, Clone)]
pub struct EngineClient {
    client: reqwest::Client,
    base_url: String,
}

impl EngineClient {
    pub fn new(config: &DialogueConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, DialogueError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, DialogueError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, DialogueError> {
        let status = response.status();
        if !status.is_success() {
            return Err(DialogueError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Send text through the REST webhook and return the first bot text.
    pub async fn webhook_reply(
        &self,
        sender: &str,
        text: &str,
    ) -> Result<Option<String>, DialogueError> {
        let body = WebhookRequest {
            sender: sender.to_string(),
            message: text.to_string(),
        };
        let messages: Vec<BotMessage> = self.post_json("/webhooks/rest/webhook", &body).await?;
        Ok(messages.into_iter().find_map(|m| m.text))
    }

    /// Fetch the engine status document.
    pub async fn status(&self) -> Result<EngineStatus, DialogueError> {
        self.get_json("/status").await
    }
}
