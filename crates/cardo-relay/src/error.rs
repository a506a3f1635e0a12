//! Error types for the relay's HTTP layer.
//!
//! [`RelayError`] is converted into an Axum response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while handling a relay request.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The request body was not a valid entry.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidEntry(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
