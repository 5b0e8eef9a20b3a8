use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Request-scoped errors, rendered as the API's structured JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing search query")]
    MissingSearchQuery,
    #[error("quote not found")]
    QuoteNotFound,
    /// The message is already safe to expose; environment-dependent
    /// redaction happens where the error is constructed.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingSearchQuery => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing search query" }),
            ),
            ApiError::QuoteNotFound => {
                (StatusCode::NOT_FOUND, json!({ "error": "Quote not found" }))
            }
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "message": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
