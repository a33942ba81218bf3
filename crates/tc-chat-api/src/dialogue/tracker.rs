//! Session-tracker strategy — webhook reply plus server-side slots.
//!
//! The webhook and the tracker read are independent round-trips. Either
//! may fail on its own; only when both fail is the turn reported as an
//! engine error.

use async_trait::async_trait;
use tc_protocol::Tracker;

use super::{DialogueEngine, DialogueError, EngineClient, EngineReply};

/// Engine that reads slot values from the per-sender conversation tracker.
pub struct TrackerEngine {
    http: EngineClient,
}

impl TrackerEngine {
    pub fn new(http: EngineClient) -> Self {
        Self { http }
    }

    async fn tracker(&self, sender: &str) -> Result<Tracker, DialogueError> {
        self.http
            .get_json(&format!("/conversations/{sender}/tracker"))
            .await
    }
}

#[async_trait]
impl DialogueEngine for TrackerEngine {
    async fn converse(&self, sender: &str, text: &str) -> Result<EngineReply, DialogueError> {
        // The webhook must land first so the tracker reflects this turn.
        let reply = self.http.webhook_reply(sender, text).await;
        let tracker = self.tracker(sender).await;

        match (reply, tracker) {
            (Ok(reply), Ok(tracker)) => Ok(EngineReply {
                reply,
                entities: tracker.slots.into_entities(),
            }),
            (Ok(reply), Err(e)) => {
                tracing::warn!(error = %e, sender, "tracker fetch failed");
                Ok(EngineReply {
                    reply,
                    entities: vec![],
                })
            }
            (Err(e), Ok(tracker)) => {
                tracing::warn!(error = %e, sender, "webhook call failed");
                Ok(EngineReply {
                    reply: None,
                    entities: tracker.slots.into_entities(),
                })
            }
            (Err(webhook), Err(tracker)) => {
                tracing::warn!(error = %tracker, sender, "tracker fetch failed");
                Err(webhook)
            }
        }
    }

    async fn healthy(&self) -> bool {
        match self.http.status().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "status probe failed");
                false
            }
        }
    }

    fn health_key(&self) -> &str {
        "rasa_healthy"
    }

    fn backend_name(&self) -> &str {
        "tracker"
    }
}
