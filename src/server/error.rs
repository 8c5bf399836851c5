//! Error types and response handling for the HTTP surface.
//!
//! Every failure is rendered as
//! `{"error": {"type", "message", "request_id", "retryable"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use crate::api::SearchFailed;
use crate::codec::CodecError;
use crate::filters::FilterError;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Query string could not be decoded into a search
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Filter action was rejected
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Card search could not be answered upstream
    #[error(transparent)]
    SearchFailed(#[from] SearchFailed),

    /// Requested item does not exist
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Reference lookup failed upstream
    #[error("{resource} are currently unavailable")]
    Unavailable { resource: String },
}

impl ServerError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        ServerError::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Map error variant to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Codec(_) => StatusCode::BAD_REQUEST,
            ServerError::Filter(_) => StatusCode::BAD_REQUEST,
            ServerError::SearchFailed(_) => StatusCode::BAD_GATEWAY,
            ServerError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServerError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get error type string for JSON responses
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Codec(_) => "invalid_query",
            ServerError::Filter(FilterError::InvalidKey { .. }) => "invalid_key",
            ServerError::Filter(FilterError::UnknownAction { .. }) => "unknown_action",
            ServerError::Filter(FilterError::InvalidValue { .. }) => "invalid_value",
            ServerError::SearchFailed(_) => "search_failed",
            ServerError::NotFound { .. } => "not_found",
            ServerError::Unavailable { .. } => "unavailable",
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            ServerError::SearchFailed(_) | ServerError::Unavailable { .. }
        )
    }
}

/// Builder for standardized error responses
pub struct ErrorResponse;

impl ErrorResponse {
    /// Create a JSON error response from a ServerError
    pub fn from_error(err: &ServerError, request_id: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "type": err.error_type(),
                "message": err.to_string(),
                "request_id": request_id,
                "retryable": err.retryable(),
            }
        });
        (err.status_code(), Json(body)).into_response()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::new_v4().to_string();
        if self.status_code().is_server_error() {
            tracing::warn!(request_id = %request_id, error = %self, "Request failed");
        } else {
            tracing::debug!(request_id = %request_id, error = %self, "Request rejected");
        }
        ErrorResponse::from_error(&self, &request_id)
    }
}
