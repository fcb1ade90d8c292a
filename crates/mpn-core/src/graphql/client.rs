use async_trait::async_trait;
use mpn_types::{ApiError, ConfigError, StoreConfig};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use super::{GraphqlRequest, GraphqlResponse, GraphqlTransport};
use crate::error::{AppError, AppResult};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";
const USER_AGENT: &str = concat!("mpn-migrate/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Shopify Admin GraphQL client.
///
/// Only connection establishment is bounded; once a request is in flight it
/// may take as long as the server needs.
pub struct AdminApiClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl AdminApiClient {
    pub fn new(store: &StoreConfig) -> AppResult<Self> {
        Self::with_endpoint(store.graphql_endpoint(), store.access_token.clone())
    }

    /// Point the client at an explicit GraphQL URL (used for mock servers).
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: String) -> AppResult<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint).map_err(|e| {
            AppError::Config(ConfigError::ValidationError {
                field: "endpoint".to_string(),
                message: format!("{}: {}", endpoint, e),
            })
        })?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        tracing::debug!("Admin API endpoint: {}", endpoint);
        Ok(Self { http, endpoint, access_token })
    }
}

#[async_trait]
impl GraphqlTransport for AdminApiClient {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ApiError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport { message: e.to_string() })?;

        let status = resp.status();

        if !status.is_success() {
            let body: String =
                resp.text().await.unwrap_or_default().chars().take(MAX_ERROR_BODY_CHARS).collect();
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::debug!("Admin API returned 429: {}", body);
            }
            return Err(ApiError::Http { status: status.as_u16(), body });
        }

        let bytes = resp.bytes().await.map_err(|e| ApiError::Transport { message: e.to_string() })?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::from_json_error(&e))
    }
}
