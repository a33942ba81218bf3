//! Chat API error type with Axum `IntoResponse` support.
//!
//! Errors render as the failure shape of `ChatResponse` so callers always
//! see `success`, `message` and `data` regardless of status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tc_protocol::ChatResponse;

/// Message returned when the chat text is missing or blank.
pub const EMPTY_INPUT_MESSAGE: &str = "Please provide input.";

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, axum::Json(ChatResponse::failure(message))).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
