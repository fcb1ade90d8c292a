//! Domain models for the migration.

mod config;
mod product;
mod result;
mod throttle;

pub use config::{MetafieldSpec, RateLimitConfig, StoreConfig, MAX_METAFIELDS_PER_MUTATION};
pub use product::ProductCandidate;
pub use result::{BatchResult, MigrationResult};
pub use throttle::ThrottleState;
