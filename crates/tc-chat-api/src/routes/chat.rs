//! Chat endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use tc_protocol::{ChatRequest, ChatResponse};

use crate::error::{ApiError, ApiResult, EMPTY_INPUT_MESSAGE};
use crate::state::AppState;

/// Header carrying the session token when the body does not.
pub const SESSION_HEADER: &str = "x-session-id";

/// POST /chat — run one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(mut request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "unreadable chat body");
        ApiError::BadRequest(EMPTY_INPUT_MESSAGE.into())
    })?;

    if request.session_id.is_none() {
        request.session_id = headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
    }

    state.chat.handle(request).await.map(Json)
}
