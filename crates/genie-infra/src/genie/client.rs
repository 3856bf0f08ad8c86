//! DatabricksGenieClient -- concrete [`GenieApi`] implementation over REST.
//!
//! Talks to one Genie space under `/api/2.0/genie/spaces/{space_id}` and to
//! the SQL statement execution API under `/api/2.0/sql/statements`. Ids are
//! pushed as percent-encoded path segments. Every request carries the
//! workspace token as a bearer header.
//!
//! The token is wrapped in [`secrecy::SecretString`] and is never logged or
//! included in `Debug` output.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use genie_core::genie::api::GenieApi;
use genie_types::error::GenieError;
use genie_types::genie::{
    GenieMessage, MessageRequest, QueryResultResponse, StartConversationResponse,
    StatementResponse,
};

/// Per-request timeout. Long-running answers are handled by polling, so
/// individual calls should return quickly.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// REST client for a single Genie space.
pub struct DatabricksGenieClient {
    client: reqwest::Client,
    base: Url,
    space_id: String,
    token: SecretString,
}

impl DatabricksGenieClient {
    /// Create a client for `space_id` on the workspace at `host`.
    ///
    /// `host` may omit the scheme (`adb-123.azuredatabricks.net`); https is
    /// assumed.
    pub fn new(host: &str, space_id: String, token: SecretString) -> Result<Self, GenieError> {
        let normalized = normalize_host(host);
        let base = Url::parse(&normalized)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| GenieError::InvalidHost(normalized))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenieError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            space_id,
            token,
        })
    }

    /// `segments` appended to the workspace URL, each percent-encoded.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, GenieError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GenieError::InvalidHost(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn space_url<'a>(&'a self, rest: &[&'a str]) -> Result<Url, GenieError> {
        let space = ["api", "2.0", "genie", "spaces", self.space_id.as_str()];
        self.endpoint(space.into_iter().chain(rest.iter().copied()))
    }

    fn message_url(
        &self,
        conversation_id: &str,
        message_id: &str,
        rest: &[&str],
    ) -> Result<Url, GenieError> {
        let mut segments = vec!["conversations", conversation_id, "messages", message_id];
        segments.extend_from_slice(rest);
        self.space_url(&segments)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GenieError> {
        let response = request
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| GenieError::Transport(e.to_string()))?;
        read_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GenieError> {
        debug!(%url, "GET");
        self.send(self.client.get(url)).await
    }

    async fn post_content<T: DeserializeOwned>(
        &self,
        url: Url,
        content: &str,
    ) -> Result<T, GenieError> {
        debug!(%url, "POST");
        self.send(self.client.post(url).json(&MessageRequest { content }))
            .await
    }
}

impl GenieApi for DatabricksGenieClient {
    async fn start_conversation(
        &self,
        content: &str,
    ) -> Result<StartConversationResponse, GenieError> {
        self.post_content(self.space_url(&["start-conversation"])?, content)
            .await
    }

    async fn create_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> Result<GenieMessage, GenieError> {
        let url = self.space_url(&["conversations", conversation_id, "messages"])?;
        self.post_content(url, content).await
    }

    async fn get_message(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> Result<GenieMessage, GenieError> {
        self.get_json(self.message_url(conversation_id, message_id, &[])?)
            .await
    }

    async fn get_message_query_result(
        &self,
        conversation_id: &str,
        message_id: &str,
    ) -> Result<QueryResultResponse, GenieError> {
        let url = self.message_url(conversation_id, message_id, &["query-result"])?;
        self.get_json(url).await
    }

    async fn get_statement(&self, statement_id: &str) -> Result<StatementResponse, GenieError> {
        let url = self.endpoint(["api", "2.0", "sql", "statements", statement_id])?;
        self.get_json(url).await
    }
}

/// Check the status, then decode the body. Non-success statuses keep the
/// response body for the log.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GenieError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| GenieError::Transport(format!("failed to read body: {e}")))?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&body).into_owned();
        warn!(status = status.as_u16(), %body, "Genie API returned an error status");
        return Err(GenieError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_slice(&body).map_err(|e| GenieError::Decode(e.to_string()))
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genie_core::format::render_answer;
    use genie_core::genie::poll::PollConfig;
    use genie_core::genie::service::GenieService;
    use genie_types::genie::MessageStatus;
    use mockito::Matcher;
    use serde_json::json;

    const SPACE: &str = "space-1";

    fn client(server: &mockito::ServerGuard) -> DatabricksGenieClient {
        DatabricksGenieClient::new(
            &server.url(),
            SPACE.to_string(),
            SecretString::from("dapi-test-not-real"),
        )
        .unwrap()
    }

    #[test]
    fn normalize_host_adds_scheme_and_trims() {
        assert_eq!(
            normalize_host("adb-1.azuredatabricks.net/"),
            "https://adb-1.azuredatabricks.net"
        );
        assert_eq!(normalize_host("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn unparseable_host_is_rejected() {
        let err = DatabricksGenieClient::new(
            "https://exa mple.com",
            SPACE.to_string(),
            SecretString::from("t"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, GenieError::InvalidHost(_)));
    }

    #[test]
    fn ids_are_encoded_as_single_segments() {
        let client = DatabricksGenieClient::new(
            "https://adb-1.azuredatabricks.net/",
            "space/1".to_string(),
            SecretString::from("t"),
        )
        .unwrap();

        let url = client
            .message_url("c/1#x", "m 1?", &["query-result"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://adb-1.azuredatabricks.net/api/2.0/genie/spaces/space%2F1/conversations/c%2F1%23x/messages/m%201%3F/query-result"
        );

        let url = client.endpoint(["api", "2.0", "sql", "statements", "s/1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://adb-1.azuredatabricks.net/api/2.0/sql/statements/s%2F1"
        );
    }

    #[tokio::test]
    async fn reserved_characters_in_ids_stay_in_their_segment() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/api/2.0/genie/spaces/space-1/conversations/c%2F1/messages/m%231",
            )
            .with_status(200)
            .with_body(json!({"id": "m#1", "status": "COMPLETED"}).to_string())
            .create_async()
            .await;

        let message = client(&server).get_message("c/1", "m#1").await.unwrap();
        assert_eq!(message.resolved_id(), Some("m#1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn start_conversation_posts_content_with_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/2.0/genie/spaces/space-1/start-conversation")
            .match_header("authorization", "Bearer dapi-test-not-real")
            .match_body(Matcher::Json(json!({"content": "top customers"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "conversation_id": "c1",
                    "message_id": "m1",
                    "conversation": {"id": "c1"},
                    "message": {"id": "m1", "status": "SUBMITTED"}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let started = client(&server)
            .start_conversation("top customers")
            .await
            .unwrap();
        assert_eq!(started.resolved_conversation_id(), Some("c1"));
        assert_eq!(started.resolved_message_id(), Some("m1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_message_targets_conversation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/2.0/genie/spaces/space-1/conversations/c1/messages")
            .match_body(Matcher::Json(json!({"content": "and by month?"})))
            .with_status(200)
            .with_body(json!({"id": "m2", "conversation_id": "c1", "status": "SUBMITTED"}).to_string())
            .create_async()
            .await;

        let message = client(&server)
            .create_message("c1", "and by month?")
            .await
            .unwrap();
        assert_eq!(message.resolved_id(), Some("m2"));
        assert_eq!(message.status, Some(MessageStatus::Submitted));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_message_and_query_result() {
        let mut server = mockito::Server::new_async().await;
        let msg_mock = server
            .mock("GET", "/api/2.0/genie/spaces/space-1/conversations/c1/messages/m1")
            .with_status(200)
            .with_body(
                json!({
                    "id": "m1",
                    "status": "COMPLETED",
                    "attachments": [{"query": {"query": "SELECT 1", "description": "One"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let result_mock = server
            .mock(
                "GET",
                "/api/2.0/genie/spaces/space-1/conversations/c1/messages/m1/query-result",
            )
            .with_status(200)
            .with_body(json!({"statement_response": {"statement_id": "s1"}}).to_string())
            .create_async()
            .await;

        let client = client(&server);
        let message = client.get_message("c1", "m1").await.unwrap();
        assert!(message.has_query());
        let result = client.get_message_query_result("c1", "m1").await.unwrap();
        assert_eq!(
            result.statement_response.unwrap().statement_id.as_deref(),
            Some("s1")
        );
        msg_mock.assert_async().await;
        result_mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_statement_uses_sql_api() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/2.0/sql/statements/s1")
            .with_status(200)
            .with_body(
                json!({
                    "statement_id": "s1",
                    "manifest": {"schema": {"columns": [{"name": "n", "type_name": "INT"}]}},
                    "result": {"data_array": [["1234"]]}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let statement = client(&server).get_statement("s1").await.unwrap();
        assert_eq!(
            statement.result.unwrap().data_array.unwrap(),
            vec![vec![json!("1234")]]
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/2.0/genie/spaces/space-1/start-conversation")
            .with_status(403)
            .with_body("permission denied")
            .create_async()
            .await;

        let err = client(&server).start_conversation("q").await.unwrap_err();
        match err {
            GenieError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/2.0/genie/spaces/space-1/conversations/c1/messages/m1")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = client(&server).get_message("c1", "m1").await.unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn missing_fields_decode_as_absent() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/2.0/genie/spaces/space-1/start-conversation")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let started = client(&server).start_conversation("q").await.unwrap();
        assert!(started.resolved_conversation_id().is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = DatabricksGenieClient::new(
            "http://127.0.0.1:1",
            SPACE.to_string(),
            SecretString::from("t"),
        )
        .unwrap();
        let err = client.get_statement("s1").await.unwrap_err();
        assert!(matches!(err, GenieError::Transport(_)));
    }

    fn fast_poll() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn ask_reports_missing_conversation_fields() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/2.0/genie/spaces/space-1/start-conversation")
            .with_status(200)
            .with_body(json!({"message": {"status": "SUBMITTED"}}).to_string())
            .create_async()
            .await;

        let service = GenieService::new(client(&server), fast_poll());
        let failure = service.ask("q", None).await.unwrap_err();
        assert!(matches!(
            failure.error,
            GenieError::MissingField("conversation_id")
        ));
    }

    #[tokio::test]
    async fn ask_reports_missing_status() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", "/api/2.0/genie/spaces/space-1/start-conversation")
            .with_status(200)
            .with_body(json!({"conversation_id": "c1", "message_id": "m1"}).to_string())
            .create_async()
            .await;
        let _poll = server
            .mock("GET", "/api/2.0/genie/spaces/space-1/conversations/c1/messages/m1")
            .with_status(200)
            .with_body(json!({"id": "m1"}).to_string())
            .create_async()
            .await;

        let service = GenieService::new(client(&server), fast_poll());
        let failure = service.ask("q", None).await.unwrap_err();
        assert_eq!(failure.conversation_id.as_deref(), Some("c1"));
        assert!(matches!(failure.error, GenieError::MissingField("status")));
    }

    #[tokio::test]
    async fn ask_end_to_end_table() {
        let mut server = mockito::Server::new_async().await;
        let _start = server
            .mock("POST", "/api/2.0/genie/spaces/space-1/start-conversation")
            .with_status(200)
            .with_body(json!({"conversation_id": "c1", "message_id": "m1"}).to_string())
            .create_async()
            .await;
        let _poll = server
            .mock("GET", "/api/2.0/genie/spaces/space-1/conversations/c1/messages/m1")
            .with_status(200)
            .with_body(
                json!({
                    "id": "m1",
                    "status": "COMPLETED",
                    "attachments": [{"query": {"description": "Order count"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let _result = server
            .mock(
                "GET",
                "/api/2.0/genie/spaces/space-1/conversations/c1/messages/m1/query-result",
            )
            .with_status(200)
            .with_body(json!({"statement_response": {"statement_id": "s1"}}).to_string())
            .create_async()
            .await;
        let _statement = server
            .mock("GET", "/api/2.0/sql/statements/s1")
            .with_status(200)
            .with_body(
                json!({
                    "manifest": {"schema": {"columns": [{"name": "orders", "type_name": "BIGINT"}]}},
                    "result": {"data_array": [["1234"]]}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let service = GenieService::new(client(&server), fast_poll());
        let reply = service.ask("how many orders?", None).await.unwrap();
        assert_eq!(reply.conversation_id, "c1");
        assert_eq!(
            render_answer(&reply.answer),
            "## Query Description\n\nOrder count\n\n## Query Results\n\n| orders |\n|---|\n| 1,234 |\n"
        );
    }
}
