//! Scan/update engine.

mod executor;
mod plan;
mod scanner;
mod updater;


pub use executor::RequestExecutor;
pub use plan::{MigrationPlan, MigrationSummary, PREVIEW_LIMIT};
pub use scanner::CatalogScanner;
pub use updater::BatchUpdater;
