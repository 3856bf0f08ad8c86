//! Content type guard for JSON endpoints.

use axum::extract::FromRequestParts;
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;

use crate::http::error::AppError;

/// Rejects the request with 415 unless it declares `application/json`.
/// Place it ahead of other extractors so media type errors win.
pub struct JsonContentType;

impl<S: Send + Sync> FromRequestParts<S> for JsonContentType {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if content_type.contains("application/json") {
            Ok(JsonContentType)
        } else {
            Err(AppError::UnsupportedMediaType(format!(
                "Expected application/json, got '{content_type}'"
            )))
        }
    }
}
