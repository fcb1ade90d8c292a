//! Batch and run outcome tallies.

use serde::{Deserialize, Serialize};

/// Outcome of a single `metafieldsSet` mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success_count: usize,
    /// `"<title>: <message>"` per reported user error, in response order
    pub failed_items: Vec<String>,
}

/// Aggregate over every batch of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResult {
    pub success_count: usize,
    pub fail_count: usize,
    pub errors: Vec<String>,
}

impl MigrationResult {
    /// Fold in a batch that completed, possibly with per-item user errors.
    pub fn absorb(&mut self, batch: BatchResult) {
        self.success_count += batch.success_count;
        self.fail_count += batch.failed_items.len();
        self.errors.extend(batch.failed_items);
    }

    /// Count a whole batch as failed with one synthesized error entry.
    pub fn record_batch_failure(&mut self, batch_number: usize, batch_len: usize, message: &str) {
        self.fail_count += batch_len;
        self.errors.push(format!("Batch {} failed: {}", batch_number, message));
    }
}
