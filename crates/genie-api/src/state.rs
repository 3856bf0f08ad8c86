//! Application state wiring the bot together.
//!
//! The bot is generic over its Genie API and conversation store; AppState
//! pins it to the reqwest client and the in-memory store.

use std::sync::Arc;

use anyhow::Context;

use genie_core::bot::GenieBot;
use genie_core::genie::service::GenieService;
use genie_infra::botframework::{ChannelTokenValidator, ConnectorClient};
use genie_infra::config::{GenieSettings, Settings};
use genie_infra::conversation::InMemoryConversationStore;
use genie_infra::genie::DatabricksGenieClient;

pub type ConcreteBot = GenieBot<DatabricksGenieClient, InMemoryConversationStore>;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<ConcreteBot>,
    pub connector: Arc<ConnectorClient>,
    /// Verifies inbound channel tokens. `None` accepts anonymous activities.
    pub channel_auth: Option<Arc<ChannelTokenValidator>>,
}

impl AppState {
    pub fn new(
        bot: ConcreteBot,
        connector: ConnectorClient,
        channel_auth: Option<ChannelTokenValidator>,
    ) -> Self {
        Self {
            bot: Arc::new(bot),
            connector: Arc::new(connector),
            channel_auth: channel_auth.map(Arc::new),
        }
    }

    /// Build the bot and connector from loaded settings.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let bot = build_bot(settings.genie)?;
        let connector = ConnectorClient::new(settings.channel.credentials())
            .context("failed to create Bot Framework connector client")?;
        let channel_auth = settings
            .channel
            .token_validator()
            .context("failed to create channel token validator")?;
        Ok(Self::new(bot, connector, channel_auth))
    }
}

/// Genie client, ask service and conversation store for one process.
pub fn build_bot(settings: GenieSettings) -> anyhow::Result<ConcreteBot> {
    let client = DatabricksGenieClient::new(&settings.host, settings.space_id, settings.token)
        .context("failed to create Genie client")?;
    let genie = GenieService::new(client, settings.poll)
        .with_full_statement_fetch(settings.fetch_full_statement);
    Ok(GenieBot::new(genie, InMemoryConversationStore::new()))
}
