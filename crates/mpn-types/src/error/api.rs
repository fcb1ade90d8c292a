//! Remote API errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while issuing a GraphQL operation.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
    /// Request never produced an HTTP response (DNS, TLS, connection reset)
    #[error("Transport error: {message}")]
    Transport {
        /// Underlying client error text
        message: String,
    },

    /// Endpoint answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// GraphQL-level errors with no usable data
    #[error("GraphQL error: {}", messages.join("; "))]
    GraphQl {
        /// Messages of every reported error, in response order
        messages: Vec<String>,
    },

    /// Response parsed but carried no `data` payload
    #[error("No data returned from GraphQL")]
    NoData,

    /// Response body could not be decoded into the expected shape
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Decoder error text
        message: String,
    },

    /// Response decoded but violates a protocol expectation
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// What was wrong with the response
        message: String,
    },
}

impl ApiError {
    /// Whether this failure means the remote limiter rejected the call.
    ///
    /// Matches the error text against "Throttled" / "rate limit"; an HTTP 429
    /// counts as throttled regardless of its body.
    pub fn is_throttled(&self) -> bool {
        if matches!(self, Self::Http { status: 429, .. }) {
            return true;
        }
        let text = self.to_string();
        text.contains("Throttled") || text.contains("rate limit")
    }

    /// Create a decode error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::Decode { message: e.to_string() }
    }
}
