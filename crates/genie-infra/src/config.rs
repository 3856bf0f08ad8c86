//! Settings loader.
//!
//! Everything comes from the process environment; a `.env` file in the
//! working directory is loaded first when present. Required Databricks
//! variables are validated up front so a misconfigured process fails at
//! startup instead of on the first turn.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use genie_core::genie::poll::PollConfig;
use genie_types::error::ConfigError;

use crate::botframework::{BotCredentials, ChannelAuthError, ChannelTokenValidator};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3978;

/// Databricks Genie connection settings.
#[derive(Debug)]
pub struct GenieSettings {
    pub host: String,
    pub space_id: String,
    pub token: SecretString,
    pub poll: PollConfig,
    pub fetch_full_statement: bool,
}

/// Bot registration for the channel connector. Empty app id means the bot
/// runs unauthenticated (local emulator).
#[derive(Debug)]
pub struct ChannelSettings {
    pub app_id: String,
    pub app_password: SecretString,
}

impl ChannelSettings {
    /// Connector credentials, or `None` when no app id is configured.
    pub fn credentials(&self) -> Option<BotCredentials> {
        if self.app_id.is_empty() {
            return None;
        }
        Some(BotCredentials {
            app_id: self.app_id.clone(),
            app_password: SecretString::from(self.app_password.expose_secret().to_string()),
        })
    }

    /// Verifier for inbound channel tokens addressed to this app id, or
    /// `None` when no app id is configured.
    pub fn token_validator(&self) -> Result<Option<ChannelTokenValidator>, ChannelAuthError> {
        if self.app_id.is_empty() {
            return Ok(None);
        }
        ChannelTokenValidator::new(self.app_id.clone()).map(Some)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug)]
pub struct Settings {
    pub genie: GenieSettings,
    pub channel: ChannelSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load `.env` (if any) and read settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to load .env: {e}"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let interval = parse_or(&get, "GENIE_POLL_INTERVAL_SECS", 5u64)?;
        let timeout = parse_or(&get, "GENIE_POLL_TIMEOUT_SECS", 1200u64)?;
        if interval == 0 {
            return Err(ConfigError::Invalid {
                key: "GENIE_POLL_INTERVAL_SECS",
                value: interval.to_string(),
            });
        }

        let genie = GenieSettings {
            host: required("DATABRICKS_HOST")?,
            space_id: required("DATABRICKS_SPACE_ID")?,
            token: SecretString::from(required("DATABRICKS_TOKEN")?),
            poll: PollConfig {
                interval: Duration::from_secs(interval),
                timeout: Duration::from_secs(timeout),
            },
            fetch_full_statement: parse_bool_or(&get, "GENIE_FETCH_FULL_STATEMENT", true)?,
        };

        let channel = ChannelSettings {
            app_id: get("MicrosoftAppId").unwrap_or_default(),
            app_password: SecretString::from(get("MicrosoftAppPassword").unwrap_or_default()),
        };

        let server = ServerSettings {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
        };

        Ok(Self {
            genie,
            channel,
            server,
        })
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => {
            let normalized = raw.trim().to_ascii_lowercase();
            match normalized.as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::Invalid { key, value: raw }),
            }
        }
    }
}
