//! Inbound channel authentication.
//!
//! When the bot has an app id configured, the channel must present an
//! `Authorization: Bearer <token>` header carrying a JWT signed by the Bot
//! Framework, addressed to this app id. The verified claims are handed to
//! the handler so it can match the activity's `serviceUrl` against them.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use genie_infra::botframework::ChannelClaims;

use crate::http::error::AppError;
use crate::state::AppState;

/// Verified channel claims, or `None` when the bot runs unauthenticated.
pub struct ChannelAuth(pub Option<ChannelClaims>);

impl ChannelAuth {
    /// Whether the caller may act for `service_url`.
    pub fn permits_service_url(&self, service_url: Option<&str>) -> bool {
        match &self.0 {
            None => true,
            Some(claims) => service_url.is_some_and(|url| claims.allows_service_url(url)),
        }
    }
}

impl FromRequestParts<AppState> for ChannelAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(validator) = &state.channel_auth else {
            return Ok(ChannelAuth(None));
        };

        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Unauthorized("Missing bearer token in Authorization header".to_string())
        })?;
        let claims = validator.validate(token).await?;
        Ok(ChannelAuth(Some(claims)))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
