//! Typed error definitions for the migration.
//!
//! Errors are split by domain:
//!
//! - [`ApiError`] covers everything that can go wrong talking to the Admin API
//! - [`ConfigError`] covers startup configuration (credentials, limits)
//!
//! Both serialize via serde so a summary can carry them as JSON.

mod api;
mod config;

pub use api::ApiError;
pub use config::ConfigError;
