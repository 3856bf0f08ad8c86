//! Ask flow: one question in, one typed answer out.
//!
//! GenieService starts or continues a conversation, waits for the message to
//! complete, and turns what Genie returned into an [`Answer`]: a result table
//! when the message carries a query, a clarification when it carries a text
//! attachment, otherwise the plain message content.

use std::fmt;

use tracing::{debug, info};

use genie_types::answer::{Answer, GenieReply, TableAnswer};
use genie_types::error::GenieError;
use genie_types::genie::StatementResponse;

use super::api::GenieApi;
use super::poll::{wait_for_message, PollConfig};

/// A failed ask. Carries the conversation id when one was learned before the
/// failure so the caller can still remember it.
#[derive(Debug)]
pub struct AskFailure {
    pub conversation_id: Option<String>,
    pub error: GenieError,
}

impl AskFailure {
    fn new(conversation_id: Option<&str>, error: GenieError) -> Self {
        Self {
            conversation_id: conversation_id.map(str::to_string),
            error,
        }
    }
}

impl fmt::Display for AskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.conversation_id {
            Some(id) => write!(f, "conversation {id}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for AskFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Orchestrates the Genie calls for a single question.
///
/// Generic over `GenieApi` so it runs against the REST client in production
/// and against fakes in tests.
pub struct GenieService<A: GenieApi> {
    api: A,
    poll: PollConfig,
    fetch_full_statement: bool,
}

impl<A: GenieApi> GenieService<A> {
    pub fn new(api: A, poll: PollConfig) -> Self {
        Self {
            api,
            poll,
            fetch_full_statement: true,
        }
    }

    /// Use the statement response inlined in the query result instead of
    /// fetching the full result set from the statement execution API.
    pub fn with_full_statement_fetch(mut self, enabled: bool) -> Self {
        self.fetch_full_statement = enabled;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Ask a question. With no `conversation_id` a new conversation is
    /// started, otherwise the question is a follow-up on that conversation.
    pub async fn ask(
        &self,
        question: &str,
        conversation_id: Option<&str>,
    ) -> Result<GenieReply, AskFailure> {
        let (conversation_id, message_id) = match conversation_id {
            None => {
                let started = self
                    .api
                    .start_conversation(question)
                    .await
                    .map_err(|e| AskFailure::new(None, e))?;
                let conversation_id = started
                    .resolved_conversation_id()
                    .ok_or_else(|| {
                        AskFailure::new(None, GenieError::MissingField("conversation_id"))
                    })?
                    .to_string();
                let message_id = started
                    .resolved_message_id()
                    .ok_or_else(|| {
                        AskFailure::new(
                            Some(conversation_id.as_str()),
                            GenieError::MissingField("message_id"),
                        )
                    })?
                    .to_string();
                info!(%conversation_id, "Started Genie conversation");
                (conversation_id, message_id)
            }
            Some(existing) => {
                let message = self
                    .api
                    .create_message(existing, question)
                    .await
                    .map_err(|e| AskFailure::new(Some(existing), e))?;
                let message_id = message
                    .resolved_id()
                    .ok_or_else(|| {
                        AskFailure::new(Some(existing), GenieError::MissingField("message_id"))
                    })?
                    .to_string();
                debug!(conversation_id = %existing, "Posted follow-up message");
                (existing.to_string(), message_id)
            }
        };

        match self.answer(&conversation_id, &message_id).await {
            Ok(answer) => Ok(GenieReply {
                answer,
                conversation_id,
            }),
            Err(error) => Err(AskFailure {
                conversation_id: Some(conversation_id),
                error,
            }),
        }
    }

    async fn answer(&self, conversation_id: &str, message_id: &str) -> Result<Answer, GenieError> {
        let message = wait_for_message(&self.api, conversation_id, message_id, &self.poll).await?;

        if message.has_query() {
            let result = self
                .api
                .get_message_query_result(conversation_id, message_id)
                .await?;
            if let Some(statement) = result.statement_response {
                let statement = self.resolve_statement(statement).await?;
                let description = message.query_description().map(str::to_string);
                let table = TableAnswer::from_statement(statement, description)
                    .ok_or(GenieError::MissingField("manifest"))?;
                debug!(rows = table.rows.len(), "Genie answered with a result table");
                return Ok(Answer::Table(table));
            }
        }

        if let Some(text) = message.text_attachment() {
            return Ok(Answer::clarification(text));
        }

        Ok(Answer::message(message.content.unwrap_or_default()))
    }

    async fn resolve_statement(
        &self,
        inline: StatementResponse,
    ) -> Result<StatementResponse, GenieError> {
        if !self.fetch_full_statement {
            return Ok(inline);
        }
        let statement_id = inline
            .statement_id
            .as_deref()
            .ok_or(GenieError::MissingField("statement_id"))?;
        self.api.get_statement(statement_id).await
    }
}
