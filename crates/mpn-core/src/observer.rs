//! Progress reporting for a migration run.
//!
//! The engine never prints. It emits [`MigrationEvent`]s to a
//! [`MigrationObserver`]; frontends (console, JSON, tests) decide what to do
//! with them.

use mpn_types::ThrottleState;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationEvent {
    /// One scan page decoded.
    PageFetched {
        page: usize,
        /// Candidates contributed by this page
        qualifying: usize,
        /// Candidates accumulated so far, this page included
        total_candidates: usize,
    },
    /// A response left the bucket below the threshold; the executor is
    /// about to wait `wait` before handing the result back.
    RateLimitLow { state: ThrottleState, wait: Duration },
    /// A throttled call will be re-attempted after `delay`.
    RetryScheduled { retry: u32, max_retries: u32, delay: Duration, reason: String },
    BatchStarted {
        batch: usize,
        total_batches: usize,
        /// 1-based position of the batch's first item in the worklist
        first_item: usize,
        last_item: usize,
        total_items: usize,
    },
    BatchCompleted { batch: usize, succeeded: usize, failed: usize, state: ThrottleState },
    /// The whole mutation failed; every item of the batch counts as failed.
    BatchFailed { batch: usize, items: usize, message: String, state: ThrottleState },
    /// Sleeping before the next batch.
    BatchPacing { delay: Duration, state: ThrottleState },
}

/// Receiver of engine progress events.
pub trait MigrationObserver: Send + Sync {
    fn on_event(&self, event: &MigrationEvent);
}

/// Discards every event.
pub struct NoopObserver;

impl MigrationObserver for NoopObserver {
    fn on_event(&self, _event: &MigrationEvent) {
        // No-op
    }
}

/// Forwards events to `tracing`.
pub struct TracingObserver;

impl MigrationObserver for TracingObserver {
    fn on_event(&self, event: &MigrationEvent) {
        match event {
            MigrationEvent::PageFetched { page, qualifying, total_candidates } => {
                info!(page, qualifying, total_candidates, "Scanned product page");
            },
            MigrationEvent::RateLimitLow { state, wait } => {
                warn!(
                    "Rate limit low ({}/{} points). Waiting {}s",
                    state.available,
                    state.maximum_available,
                    wait.as_secs()
                );
            },
            MigrationEvent::RetryScheduled { retry, max_retries, delay, reason } => {
                warn!(
                    "Rate limited. Retry {}/{} in {}ms: {}",
                    retry,
                    max_retries,
                    delay.as_millis(),
                    reason
                );
            },
            MigrationEvent::BatchStarted { batch, total_batches, first_item, last_item, total_items } => {
                info!(
                    "Processing batch {}/{} (products {}-{} of {})",
                    batch, total_batches, first_item, last_item, total_items
                );
            },
            MigrationEvent::BatchCompleted { batch, succeeded, failed, state } => {
                info!(
                    batch,
                    succeeded,
                    failed,
                    available = state.available,
                    "Batch complete"
                );
            },
            MigrationEvent::BatchFailed { batch, items, message, .. } => {
                error!(batch, items, "Batch failed: {}", message);
            },
            MigrationEvent::BatchPacing { delay, state } => {
                debug!(
                    delay_ms = delay.as_millis() as u64,
                    available = state.available,
                    "Pacing before next batch"
                );
            },
        }
    }
}
