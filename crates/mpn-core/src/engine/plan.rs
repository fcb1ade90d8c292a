use mpn_types::{MigrationResult, ProductCandidate};
use serde::Serialize;

/// Number of candidates listed before the countdown.
pub const PREVIEW_LIMIT: usize = 30;

/// Scan results split into work still to do and work already done.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPlan {
    /// Products carrying a source value
    pub total_with_source: usize,
    pub already_migrated: usize,
    pub to_update: Vec<ProductCandidate>,
}

impl MigrationPlan {
    pub fn from_candidates(candidates: Vec<ProductCandidate>) -> Self {
        let total_with_source = candidates.len();
        let to_update: Vec<_> = candidates.into_iter().filter(|c| c.needs_update).collect();
        Self { total_with_source, already_migrated: total_with_source - to_update.len(), to_update }
    }

    pub fn is_empty(&self) -> bool {
        self.to_update.is_empty()
    }

    pub fn preview(&self, limit: usize) -> &[ProductCandidate] {
        &self.to_update[..self.to_update.len().min(limit)]
    }

    /// Candidates left out of [`Self::preview`].
    pub fn remaining_after_preview(&self, limit: usize) -> usize {
        self.to_update.len().saturating_sub(limit)
    }

    /// Mutations needed at `batch_size` items each.
    pub fn estimated_requests(&self, batch_size: usize) -> usize {
        self.to_update.len().div_ceil(batch_size.max(1))
    }
}

/// Final report of a run.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationSummary {
    pub total_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub already_migrated: usize,
    pub errors: Vec<String>,
}

impl MigrationSummary {
    pub fn new(plan: &MigrationPlan, result: MigrationResult) -> Self {
        Self {
            total_processed: plan.to_update.len(),
            succeeded: result.success_count,
            failed: result.fail_count,
            already_migrated: plan.already_migrated,
            errors: result.errors,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
