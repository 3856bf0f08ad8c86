//! GenieApi trait definition.
//!
//! The raw REST surface of one Genie space plus the statement execution API.
//! Methods return wire types untouched; validation of missing fields happens
//! in [`GenieService`](super::service::GenieService).

use genie_types::error::GenieError;
use genie_types::genie::{
    GenieMessage, QueryResultResponse, StartConversationResponse, StatementResponse,
};

/// Trait for Genie API backends.
///
/// Implementations live in genie-infra (e.g., `DatabricksGenieClient`). Tests
/// use hand-written fakes.
pub trait GenieApi: Send + Sync {
    /// Start a new conversation with an initial question.
    fn start_conversation(
        &self,
        content: &str,
    ) -> impl std::future::Future<Output = Result<StartConversationResponse, GenieError>> + Send;

    /// Post a follow-up question on an existing conversation.
    fn create_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> impl std::future::Future<Output = Result<GenieMessage, GenieError>> + Send;

    /// Fetch the current state of a message.
    fn get_message(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> impl std::future::Future<Output = Result<GenieMessage, GenieError>> + Send;

    /// Fetch the query result attached to a completed message.
    fn get_message_query_result(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> impl std::future::Future<Output = Result<QueryResultResponse, GenieError>> + Send;

    /// Fetch a statement's full result set from the statement execution API.
    fn get_statement(
        &self,
        statement_id: &str,
    ) -> impl std::future::Future<Output = Result<StatementResponse, GenieError>> + Send;
}
