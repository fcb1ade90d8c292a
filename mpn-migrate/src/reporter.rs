//! Console rendering of engine progress events.

use colored::Colorize;
use mpn_core::{MigrationEvent, MigrationObserver};
use mpn_types::{MetafieldSpec, ThrottleState};
use std::time::Duration;

/// Prints progress to stdout as the run advances.
pub struct ConsoleReporter {
    throttle_threshold: f64,
}

impl ConsoleReporter {
    pub fn new(throttle_threshold: f64) -> Self {
        Self { throttle_threshold }
    }

    /// Announced whenever the budget sits below the threshold, even if the
    /// pause rounds back down to the minimum.
    fn pacing_notice(&self, delay: Duration, state: &ThrottleState) -> Option<String> {
        state
            .is_below(self.throttle_threshold)
            .then(|| format!("  ⏳ Adding {}ms delay to restore rate limit...", delay.as_millis()))
    }
}

fn budget_line(state: &ThrottleState) -> String {
    format!(
        "  Rate limit: {}/{} points available",
        state.available, state.maximum_available
    )
}

impl MigrationObserver for ConsoleReporter {
    fn on_event(&self, event: &MigrationEvent) {
        match event {
            MigrationEvent::PageFetched { page, total_candidates, .. } => {
                println!(
                    "  Page {}: Found {} products with {}",
                    page,
                    total_candidates,
                    MetafieldSpec::SOURCE_MPN.qualified_name()
                );
            },
            MigrationEvent::RateLimitLow { state, wait } => {
                println!(
                    "{}",
                    format!(
                        "⚠️  Rate limit low ({}/{} points). Waiting {}s...",
                        state.available,
                        state.maximum_available,
                        wait.as_secs()
                    )
                    .yellow()
                );
            },
            MigrationEvent::RetryScheduled { retry, max_retries, delay, .. } => {
                println!(
                    "{}",
                    format!(
                        "⚠️  Rate limited. Retry {}/{} in {}ms...",
                        retry,
                        max_retries,
                        delay.as_millis()
                    )
                    .yellow()
                );
            },
            MigrationEvent::BatchStarted { batch, total_batches, first_item, last_item, total_items } => {
                println!(
                    "\nProcessing batch {}/{} (products {}-{} of {})...",
                    batch, total_batches, first_item, last_item, total_items
                );
            },
            MigrationEvent::BatchCompleted { succeeded, failed, state, .. } => {
                if *failed > 0 {
                    println!("{}", format!("  ⚠️  {} failures in this batch", failed).yellow());
                    println!(
                        "  {} Batch complete: {} successful, {} failed",
                        "✓".green(),
                        succeeded,
                        failed
                    );
                } else {
                    println!("  {} Batch complete: {} successful", "✓".green(), succeeded);
                }
                println!("{}", budget_line(state));
            },
            MigrationEvent::BatchFailed { batch, message, state, .. } => {
                println!("{}", format!("  ❌ Batch {} failed: {}", batch, message).red());
                println!("{}", budget_line(state));
            },
            MigrationEvent::BatchPacing { delay, state } => {
                if let Some(notice) = self.pacing_notice(*delay, state) {
                    println!("{}", notice);
                }
            },
        }
    }
}
