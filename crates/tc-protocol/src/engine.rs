//! Wire types for the Rasa-compatible dialogue engine HTTP API.

use serde::{Deserialize, Serialize};

/// Entity name carrying the topology label.
pub const TOPOLOGY_ENTITY: &str = "topology";

/// Entity (and tracker slot) name carrying the device count.
pub const DEVICE_COUNT_ENTITY: &str = "device_count";

/// `POST /model/parse` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// `POST /model/parse` response (only the fields we read).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResponse {
    #[serde(default)]
    pub entities: Vec<EngineEntity>,
}

/// A labeled value recognized by the engine.
///
/// `value` is kept as raw JSON: engines emit strings for most entities but
/// numbers for some extractors (duckling, regex features).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineEntity {
    pub entity: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl EngineEntity {
    pub fn new(entity: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
        }
    }

    /// The value as text, if it is a string or a number.
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// `POST /webhooks/rest/webhook` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub sender: String,
    pub message: String,
}

/// One bot utterance from the webhook (the response is a JSON array of these).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotMessage {
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// `GET /conversations/{sender}/tracker` response (only the slots).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub slots: TrackerSlots,
}

/// Slots persisted by the engine for one conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerSlots {
    #[serde(default)]
    pub topology: Option<serde_json::Value>,
    #[serde(default)]
    pub device_count: Option<serde_json::Value>,
}

impl TrackerSlots {
    /// Present the filled slots as entities so they share one extraction path.
    pub fn into_entities(self) -> Vec<EngineEntity> {
        [
            (TOPOLOGY_ENTITY, self.topology),
            (DEVICE_COUNT_ENTITY, self.device_count),
        ]
        .into_iter()
        .filter_map(|(name, value)| match value {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(EngineEntity::new(name, v)),
        })
        .collect()
    }
}

/// `GET /status` response (only the fields we read).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStatus {
    #[serde(default)]
    pub model_file: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
}
