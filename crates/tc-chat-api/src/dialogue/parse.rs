//! Direct-parse strategy — entities straight from `/model/parse`.

use async_trait::async_trait;
use tc_protocol::{ParseRequest, ParseResponse};

use super::{DialogueEngine, DialogueError, EngineClient, EngineReply};

/// Engine that reads entities from the NLU parse endpoint.
pub struct ParseEngine {
    http: EngineClient,
    /// Also fetch a reply text through the webhook.
    generate_reply: bool,
}

impl ParseEngine {
    pub fn new(http: EngineClient, generate_reply: bool) -> Self {
        Self {
            http,
            generate_reply,
        }
    }

    async fn reply(&self, sender: &str, text: &str) -> Option<String> {
        if !self.generate_reply {
            return None;
        }
        match self.http.webhook_reply(sender, text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "reply generation failed");
                None
            }
        }
    }
}

#[async_trait]
impl DialogueEngine for ParseEngine {
    async fn converse(&self, sender: &str, text: &str) -> Result<EngineReply, DialogueError> {
        let request = ParseRequest {
            text: text.to_string(),
        };
        let parsed = self
            .http
            .post_json::<_, ParseResponse>("/model/parse", &request)
            .await;
        let reply = self.reply(sender, text).await;

        match parsed {
            Ok(parsed) => Ok(EngineReply {
                reply,
                entities: parsed.entities,
            }),
            Err(e) if reply.is_some() => {
                tracing::warn!(error = %e, "parse failed, keeping reply only");
                Ok(EngineReply {
                    reply,
                    entities: vec![],
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn healthy(&self) -> bool {
        match self.http.status().await {
            Ok(status) => status.model_file.is_some_and(|f| !f.is_empty()),
            Err(e) => {
                tracing::debug!(error = %e, "status probe failed");
                false
            }
        }
    }

    fn health_key(&self) -> &str {
        "model_loaded"
    }

    fn backend_name(&self) -> &str {
        "parse"
    }
}
