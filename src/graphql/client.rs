use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{GraphqlError, GraphqlTransport};

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// GraphQL-over-HTTP client for the CMS endpoint.
///
/// Reuses a single `reqwest::Client` for connection pooling.
#[derive(Clone)]
pub struct HttpGraphqlClient {
    http: Client,
    endpoint: String,
}

impl HttpGraphqlClient {
    /// Create a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GraphqlError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("conflict-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    async fn execute(&self, document: &str, variables: Value) -> Result<Value, GraphqlError> {
        debug!(endpoint = %self.endpoint, "Sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&GraphqlRequest {
                query: document,
                variables,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphqlError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GraphqlResponse = response.json().await?;
        if !body.errors.is_empty() {
            return Err(GraphqlError::Response {
                messages: body.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        match body.data {
            Some(Value::Null) | None => Err(GraphqlError::MissingData),
            Some(data) => Ok(data),
        }
    }
}

#[async_trait]
impl GraphqlTransport for HttpGraphqlClient {
    async fn query(&self, document: &str, variables: Value) -> Result<Value, GraphqlError> {
        self.execute(document, variables).await
    }

    async fn mutate(&self, document: &str, variables: Value) -> Result<Value, GraphqlError> {
        self.execute(document, variables).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpGraphqlClient {
        HttpGraphqlClient::new(format!("{}/graphql", server.uri()), Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_query_returns_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({ "variables": { "slug": "hello" } })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "post": { "title": "Hello" } } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let data = client
            .query("query { post { title } }", json!({ "slug": "hello" }))
            .await
            .unwrap();

        assert_eq!(data, json!({ "post": { "title": "Hello" } }));
    }

    #[tokio::test]
    async fn test_graphql_errors_are_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Cannot query field \"seo\"" }],
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.query("{ seo }", json!({})).await.unwrap_err();

        match err {
            GraphqlError::Response { messages } => {
                assert_eq!(messages, ["Cannot query field \"seo\""]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.mutate("mutation { x }", json!({})).await.unwrap_err();

        assert!(matches!(err, GraphqlError::Status { status: 500, ref body } if body == "boom"));
    }

    #[tokio::test]
    async fn test_missing_data_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.query("{ posts }", json!({})).await.unwrap_err();

        assert!(matches!(err, GraphqlError::MissingData));
    }
}
