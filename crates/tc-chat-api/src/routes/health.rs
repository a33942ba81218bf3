//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health — liveness plus a best-effort dialogue engine probe.
///
/// Always 200; the engine's state is reported under its strategy's key
/// (`model_loaded` or `rasa_healthy`).
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let engine = state.chat.engine();
    let mut body = json!({ "status": "healthy" });
    body[engine.health_key()] = json!(engine.healthy().await);
    Json(body)
}
