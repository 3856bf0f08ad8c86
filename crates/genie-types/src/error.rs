use thiserror::Error;

/// Errors from talking to the Genie and SQL statement APIs.
#[derive(Debug, Error)]
pub enum GenieError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("response missing expected field '{0}'")]
    MissingField(&'static str),

    #[error("message ended with status {status}: {message}")]
    MessageFailed { status: String, message: String },

    #[error("gave up waiting for message after {0}s")]
    Timeout(u64),

    #[error("invalid workspace host '{0}'")]
    InvalidHost(String),
}

impl GenieError {
    /// Whether the failure came from an undecodable response body.
    pub fn is_decode(&self) -> bool {
        matches!(self, GenieError::Decode(_))
    }
}

/// Errors from the conversation store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conversation store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from loading settings at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genie_error_display() {
        let err = GenieError::Status {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: not found");

        let err = GenieError::MissingField("conversation_id");
        assert_eq!(
            err.to_string(),
            "response missing expected field 'conversation_id'"
        );
    }

    #[test]
    fn test_is_decode() {
        assert!(GenieError::Decode("eof".to_string()).is_decode());
        assert!(!GenieError::Timeout(5).is_decode());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Missing("DATABRICKS_HOST");
        assert_eq!(
            err.to_string(),
            "missing required environment variable DATABRICKS_HOST"
        );

        let err = ConfigError::Invalid {
            key: "PORT",
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("'abc'"));
    }
}
