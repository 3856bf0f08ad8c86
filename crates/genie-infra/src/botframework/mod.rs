//! Bot Framework plumbing: inbound channel token verification, outbound
//! replies and their OAuth token.

pub mod auth;
pub mod channel_auth;
pub mod connector;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

use thiserror::Error;

pub use auth::{BotCredentials, TokenCache};
pub use channel_auth::{ChannelClaims, ChannelTokenValidator};
pub use connector::ConnectorClient;

/// Errors from delivering activities to a channel.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("token request failed: {0}")]
    Token(String),

    #[error("activity missing {0}")]
    MissingField(&'static str),

    #[error("invalid service url '{0}'")]
    InvalidServiceUrl(String),
}

/// Errors from verifying the token a channel sends with an activity.
#[derive(Debug, Error)]
pub enum ChannelAuthError {
    #[error("invalid channel token: {0}")]
    InvalidToken(String),

    #[error("channel token signed with unknown key '{0}'")]
    UnknownKey(String),

    #[error("failed to fetch channel signing keys: {0}")]
    KeyFetch(String),
}
