use serde::{Deserialize, Serialize};

/// Inbound chat turn (`POST /chat` body).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-text user message. A missing field reads as empty.
    #[serde(default)]
    pub message: String,
    /// Session token returned by the previous turn, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// The two structured fields this service cares about.
///
/// Used both for one turn's extraction and for the merged session state
/// reported back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    /// Lower-cased topology label (e.g. "star", "mesh").
    pub topology: Option<String>,
    /// Requested number of devices.
    pub devices: Option<u32>,
}

/// Outbound chat response, shared by success and failure paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    /// Dialogue engine reply, default acknowledgement, or error diagnostic.
    pub message: String,
    /// Both fields are known and the caller should create the topology.
    #[serde(rename = "create_topology", default)]
    pub ready_to_create: bool,
    /// Token to send with the next turn. Fresh after a topology is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Merged session state after this turn.
    pub data: ExtractedEntities,
}

impl ChatResponse {
    /// Failure body: no data, no session.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ready_to_create: false,
            session_id: None,
            data: ExtractedEntities::default(),
        }
    }
}
