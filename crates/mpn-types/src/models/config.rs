//! Run configuration: rate limits, store connection, metafield identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use validator::Validate;

use crate::error::ConfigError;

/// Largest item count `metafieldsSet` accepts in a single mutation.
pub const MAX_METAFIELDS_PER_MUTATION: usize = 25;

/// Admin API rate-limit tuning. Read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RateLimitConfig {
    /// Items per `metafieldsSet` mutation
    #[validate(range(min = 1, max = 25))]
    #[serde(default = "default_metafields_per_mutation")]
    pub metafields_per_mutation: usize,
    /// Reserved; batches are issued sequentially
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Slow down when available points drop below this
    #[validate(range(min = 1.0))]
    #[serde(default = "default_throttle_threshold")]
    pub throttle_threshold: f64,
    /// Minimum pause between batches, also the first retry backoff
    #[serde(default = "default_min_batch_delay_ms")]
    pub min_batch_delay_ms: u64,
    /// Automatic re-attempts for a throttled call
    #[validate(range(max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff multiplier between retries
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            metafields_per_mutation: default_metafields_per_mutation(),
            max_concurrent_requests: default_max_concurrent_requests(),
            throttle_threshold: default_throttle_threshold(),
            min_batch_delay_ms: default_min_batch_delay_ms(),
            max_retries: default_max_retries(),
            retry_backoff: default_retry_backoff(),
        }
    }
}

impl RateLimitConfig {
    pub fn min_batch_delay(&self) -> Duration {
        Duration::from_millis(self.min_batch_delay_ms)
    }

    /// Delay before re-attempt number `retry + 1`:
    /// `min_batch_delay * retry_backoff ^ retry`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = u64::from(self.retry_backoff).saturating_pow(retry);
        Duration::from_millis(self.min_batch_delay_ms.saturating_mul(factor))
    }

    /// Run `validator` and map the first failure to a [`ConfigError`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate().map_err(|e| ConfigError::from_validation(&e))?;
        Ok(self)
    }
}

pub const fn default_metafields_per_mutation() -> usize {
    MAX_METAFIELDS_PER_MUTATION
}

pub const fn default_max_concurrent_requests() -> usize {
    10
}

pub const fn default_throttle_threshold() -> f64 {
    100.0
}

pub const fn default_min_batch_delay_ms() -> u64 {
    500
}

pub const fn default_max_retries() -> u32 {
    3
}

pub const fn default_retry_backoff() -> u32 {
    2
}

/// Connection details for one store's Admin API.
#[derive(Clone, PartialEq, Eq, Validate)]
pub struct StoreConfig {
    /// Bare myshopify domain, no scheme
    #[validate(length(min = 1_u64))]
    pub store_domain: String,
    #[validate(length(min = 1_u64))]
    pub api_version: String,
    pub access_token: String,
}

impl StoreConfig {
    pub const DEFAULT_API_VERSION: &'static str = "2025-10";

    /// Assemble a store config, rejecting a missing credential before any
    /// network activity happens.
    pub fn new(
        store_domain: &str,
        api_version: &str,
        access_token: Option<String>,
        token_var: &str,
    ) -> Result<Self, ConfigError> {
        let access_token = access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingCredential { var: token_var.to_string() })?;

        let store_domain = store_domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();

        let config = Self { store_domain, api_version: api_version.trim().to_string(), access_token };
        config.validate().map_err(|e| ConfigError::from_validation(&e))?;
        if config.store_domain.contains('/') {
            return Err(ConfigError::ValidationError {
                field: "store_domain".to_string(),
                message: "expected a bare domain such as my-store.myshopify.com".to_string(),
            });
        }
        Ok(config)
    }

    /// `https://{store}/admin/api/{version}/graphql.json`
    pub fn graphql_endpoint(&self) -> String {
        format!("https://{}/admin/api/{}/graphql.json", self.store_domain, self.api_version)
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("store_domain", &self.store_domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Namespaced metafield identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetafieldSpec {
    pub namespace: &'static str,
    pub key: &'static str,
    pub value_type: &'static str,
}

impl MetafieldSpec {
    /// Where the MPN lives today.
    pub const SOURCE_MPN: Self = Self {
        namespace: "shopify--facts",
        key: "mpn",
        value_type: "single_line_text_field",
    };

    /// Where the MPN is copied to.
    pub const TARGET_MPN: Self =
        Self { namespace: "custom", key: "mpn", value_type: "single_line_text_field" };

    /// `namespace.key`, as shown to operators.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}
