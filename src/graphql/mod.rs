//! GraphQL transport to the CMS.
//!
//! The post layer only sees [`GraphqlTransport`]; [`HttpGraphqlClient`] is the
//! production implementation talking to WPGraphQL over HTTP.

mod client;
pub mod queries;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use client::HttpGraphqlClient;

#[derive(Debug, Error)]
pub enum GraphqlError {
    #[error("GraphQL request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors: {}", .messages.join("; "))]
    Response { messages: Vec<String> },

    #[error("GraphQL response has no data")]
    MissingData,
}

/// Issues queries and mutations against the CMS and returns the `data` object.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Run a query document.
    async fn query(&self, document: &str, variables: Value) -> Result<Value, GraphqlError>;

    /// Run a mutation document.
    async fn mutate(&self, document: &str, variables: Value) -> Result<Value, GraphqlError>;
}
