//! Scripted in-memory `GenieApi` used by the core unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use genie_types::error::GenieError;
use genie_types::genie::{
    GenieMessage, MessageStatus, QueryResultResponse, StartConversationResponse,
    StatementResponse,
};

use super::api::GenieApi;

pub(crate) fn message_with_status(status: MessageStatus) -> GenieMessage {
    GenieMessage {
        id: Some("m1".to_string()),
        conversation_id: Some("c1".to_string()),
        status: Some(status),
        ..GenieMessage::default()
    }
}

/// Returns canned responses and records which endpoints were called.
///
/// `get_message` pops scripted messages in order and repeats the last one.
#[derive(Default)]
pub(crate) struct FakeGenie {
    pub start: StartConversationResponse,
    pub created: GenieMessage,
    pub polls: Mutex<VecDeque<GenieMessage>>,
    pub query_result: QueryResultResponse,
    pub statement: StatementResponse,
    /// Endpoint name that fails, and the error it fails with.
    pub fail: Option<(&'static str, fn() -> GenieError)>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGenie {
    pub fn with_polls(self, polls: Vec<GenieMessage>) -> Self {
        Self {
            polls: Mutex::new(polls.into()),
            ..self
        }
    }

    pub fn failing(self, endpoint: &'static str, error: fn() -> GenieError) -> Self {
        Self {
            fail: Some((endpoint, error)),
            ..self
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == endpoint).count()
    }

    fn record(&self, endpoint: &'static str) -> Result<(), GenieError> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        match self.fail {
            Some((name, error)) if name == endpoint => Err(error()),
            _ => Ok(()),
        }
    }
}

impl GenieApi for FakeGenie {
    async fn start_conversation(
        &self,
        _content: &str,
    ) -> Result<StartConversationResponse, GenieError> {
        self.record("start_conversation")?;
        Ok(self.start.clone())
    }

    async fn create_message(
        &self,
        _conversation_id: &str,
        _content: &str,
    ) -> Result<GenieMessage, GenieError> {
        self.record("create_message")?;
        Ok(self.created.clone())
    }

    async fn get_message(
        &self,
        _conversation_id: &str,
        _message_id: &str,
    ) -> Result<GenieMessage, GenieError> {
        self.record("get_message")?;
        let mut polls = self.polls.lock().unwrap();
        let next = if polls.len() > 1 {
            polls.pop_front()
        } else {
            polls.front().cloned()
        };
        Ok(next.unwrap_or_default())
    }

    async fn get_message_query_result(
        &self,
        _conversation_id: &str,
        _message_id: &str,
    ) -> Result<QueryResultResponse, GenieError> {
        self.record("get_message_query_result")?;
        Ok(self.query_result.clone())
    }

    async fn get_statement(&self, _statement_id: &str) -> Result<StatementResponse, GenieError> {
        self.record("get_statement")?;
        Ok(self.statement.clone())
    }
}
