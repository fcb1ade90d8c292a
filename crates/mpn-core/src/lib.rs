//! # MPN Core
//!
//! Engine for copying a product metafield from one namespace to another
//! across a whole catalog through the Shopify Admin GraphQL API.
//!
//! ```text
//! mpn-core/src/
//! ├── graphql/      # Transport trait, reqwest client, operation documents
//! ├── engine/       # Request executor, catalog scanner, batch updater, plan
//! ├── throttle.rs   # Leaky-bucket budget tracking and delay math
//! ├── observer.rs   # Progress events, decoupled from console output
//! └── config.rs     # Store profiles and credential resolution
//! ```
//!
//! All API traffic goes through [`engine::RequestExecutor`], which owns the
//! [`throttle::ThrottleTracker`] for the run. Nothing here is a process-wide
//! singleton; a run is just an executor value threaded through the scanner
//! and the updater.

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod engine;
pub mod error;
pub mod graphql;
pub mod observer;
pub mod throttle;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use engine::{BatchUpdater, CatalogScanner, MigrationPlan, MigrationSummary, RequestExecutor};
pub use error::{AppError, AppResult};
pub use graphql::{AdminApiClient, GraphqlTransport};
pub use observer::{MigrationEvent, MigrationObserver, NoopObserver, TracingObserver};
pub use throttle::ThrottleTracker;
