//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use genie_infra::botframework::{ChannelAuthError, ConnectorError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Request body is not JSON.
    UnsupportedMediaType(String),
    /// Body could not be decoded as an activity.
    BadRequest(String),
    /// Missing channel credentials, or a token that does not cover the activity.
    Unauthorized(String),
    /// Channel token failed verification.
    ChannelAuth(ChannelAuthError),
    /// Reply delivery failed.
    Connector(ConnectorError),
}

impl From<ConnectorError> for AppError {
    fn from(e: ConnectorError) -> Self {
        AppError::Connector(e)
    }
}

impl From<ChannelAuthError> for AppError {
    fn from(e: ChannelAuthError) -> Self {
        AppError::ChannelAuth(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::ChannelAuth(ChannelAuthError::KeyFetch(msg)) => {
                tracing::error!(error = %msg, "Failed to fetch channel signing keys");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "KEY_FETCH_ERROR",
                    "Channel signing keys unavailable".to_string(),
                )
            }
            AppError::ChannelAuth(e) => {
                tracing::warn!(error = %e, "Rejected channel token");
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
            }
            AppError::Connector(e) => {
                tracing::error!(error = %e, "Failed to deliver reply");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONNECTOR_ERROR",
                    e.to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
