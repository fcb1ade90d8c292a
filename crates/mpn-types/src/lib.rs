//! # MPN Types
//!
//! Data model and error definitions for the MPN metafield migration.
//!
//! - **`error`** - Typed errors for remote API calls and configuration
//! - **`models`** - Throttle budget, scan candidates, batch outcomes, config
//!
//! ## Architecture Role
//!
//! `mpn-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        mpn-types (this crate)
//!              │
//!              ▼
//!          mpn-core
//!              │
//!              ▼
//!         mpn-migrate
//! ```
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod models;

pub use error::{ApiError, ConfigError};

pub use models::{
    BatchResult, MetafieldSpec, MigrationResult, ProductCandidate, RateLimitConfig, StoreConfig,
    ThrottleState, MAX_METAFIELDS_PER_MUTATION,
};
