//! Placeholder engine when no dialogue backend is configured.

use async_trait::async_trait;

use super::{DialogueEngine, DialogueError, EngineReply};

/// Engine that is never available; turns run on the regex fallback alone.
pub struct DisabledEngine;

#[async_trait]
impl DialogueEngine for DisabledEngine {
    async fn converse(&self, _sender: &str, _text: &str) -> Result<EngineReply, DialogueError> {
        Err(DialogueError::Unavailable("no dialogue engine configured".into()))
    }

    async fn healthy(&self) -> bool {
        false
    }

    fn health_key(&self) -> &str {
        "model_loaded"
    }

    fn backend_name(&self) -> &str {
        "disabled"
    }
}
