//! Turn handler: the bot's reaction to one inbound chat event.
//!
//! `GenieBot` looks up the user's conversation, asks Genie, remembers the
//! conversation id Genie answered in, and formats the answer. Every failure
//! degrades to a chat message; nothing here returns an error.

use tracing::{error, info, warn};

use genie_types::activity::ChannelAccount;
use genie_types::answer::Answer;

use crate::conversation::store::ConversationStore;
use crate::format::render_answer;
use crate::genie::api::GenieApi;
use crate::genie::service::GenieService;

pub const WELCOME_MESSAGE: &str = "Welcome to the Databricks Genie Bot!";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";
pub const DECODE_ERROR_MESSAGE: &str = "Failed to decode response from the server.";
pub const EMPTY_QUESTION_MESSAGE: &str = "Please type a question about your data.";

/// The bot: Genie access plus the per-user conversation mapping.
///
/// Generic over `GenieApi` and `ConversationStore`; genie-api pins both to
/// the concrete infra implementations.
pub struct GenieBot<A: GenieApi, S: ConversationStore> {
    genie: GenieService<A>,
    store: S,
}

impl<A: GenieApi, S: ConversationStore> GenieBot<A, S> {
    pub fn new(genie: GenieService<A>, store: S) -> Self {
        Self { genie, store }
    }

    pub fn genie(&self) -> &GenieService<A> {
        &self.genie
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle a message from `user_id` and return the markdown reply.
    pub async fn on_message(&self, user_id: &str, text: &str) -> String {
        let question = text.trim();
        if question.is_empty() {
            return EMPTY_QUESTION_MESSAGE.to_string();
        }

        let known = match self.store.get(user_id).await {
            Ok(known) => known,
            Err(e) => {
                error!(%user_id, error = %e, "Failed to look up conversation");
                return render_answer(&Answer::error(GENERIC_ERROR_MESSAGE));
            }
        };

        let answer = match self.genie.ask(question, known.as_deref()).await {
            Ok(reply) => {
                self.remember(user_id, &reply.conversation_id).await;
                reply.answer
            }
            Err(failure) => {
                if let Some(conversation_id) = failure.conversation_id.as_deref() {
                    self.remember(user_id, conversation_id).await;
                }
                error!(%user_id, error = %failure, "Error asking Genie");
                let text = if failure.error.is_decode() {
                    DECODE_ERROR_MESSAGE
                } else {
                    GENERIC_ERROR_MESSAGE
                };
                Answer::error(text)
            }
        };

        render_answer(&answer)
    }

    /// Welcome messages for newly added members, skipping the bot itself.
    pub fn on_members_added(
        &self,
        members: &[ChannelAccount],
        recipient_id: Option<&str>,
    ) -> Vec<String> {
        members
            .iter()
            .filter(|m| Some(m.id.as_str()) != recipient_id)
            .map(|m| {
                info!(member_id = %m.id, "Welcoming new member");
                WELCOME_MESSAGE.to_string()
            })
            .collect()
    }

    async fn remember(&self, user_id: &str, conversation_id: &str) {
        if let Err(e) = self.store.set(user_id, conversation_id).await {
            warn!(%user_id, %conversation_id, error = %e, "Failed to store conversation id");
        }
    }
}
