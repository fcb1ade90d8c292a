//! GraphQL plumbing: the transport seam, the reqwest-backed Admin API client,
//! and the two operation documents the migration uses.

mod client;
pub mod operations;

pub use client::AdminApiClient;

use async_trait::async_trait;
use mpn_types::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Operation document plus variables, serialized as the POST body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self { query: query.into(), variables }
    }
}

/// Raw GraphQL response envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorEntry>,
    #[serde(default)]
    pub extensions: Option<Value>,
}

/// One entry of the top-level `errors` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<Value>,
}

/// Something that can carry a GraphQL operation to the remote store.
///
/// Implementations only report transport and HTTP failures; GraphQL-level
/// `errors` come back inside an `Ok` response for the executor to judge.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ApiError>;
}

#[async_trait]
impl<T: GraphqlTransport + ?Sized> GraphqlTransport for Arc<T> {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ApiError> {
        (**self).execute(request).await
    }
}
