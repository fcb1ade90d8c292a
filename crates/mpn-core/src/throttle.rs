//! Tracking of the Admin API's leaky-bucket cost budget.
//!
//! Every GraphQL response may carry
//! `extensions.cost.throttleStatus = {currentlyAvailable, restoreRate, maximumAvailable}`.
//! The tracker keeps the most recent report; when a response has none, the
//! previous value is reused as-is.

use mpn_types::{RateLimitConfig, ThrottleState};
use serde_json::Value;
use std::time::Duration;

/// Most recently reported throttle budget for one run.
#[derive(Debug, Clone, Default)]
pub struct ThrottleTracker {
    state: ThrottleState,
}

impl ThrottleTracker {
    /// Start from the conservative default budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked state wholesale with the reported throttle status.
    ///
    /// Returns the new state when the extensions carried a report, `None`
    /// (and leaves the state untouched) otherwise. No monotonicity check: the
    /// remote side may move `available` anywhere.
    pub fn observe(&mut self, extensions: Option<&Value>) -> Option<ThrottleState> {
        let reported = extensions.and_then(parse_throttle_status)?;
        self.state = reported;
        Some(reported)
    }

    pub fn current_state(&self) -> ThrottleState {
        self.state
    }
}

/// Pull a [`ThrottleState`] out of a response's `extensions` object.
pub fn parse_throttle_status(extensions: &Value) -> Option<ThrottleState> {
    let status = extensions.get("cost")?.get("throttleStatus")?;
    if !status.is_object() {
        return None;
    }
    Some(ThrottleState::reported(
        status.get("currentlyAvailable").and_then(Value::as_f64),
        status.get("restoreRate").and_then(Value::as_f64),
        status.get("maximumAvailable").and_then(Value::as_f64),
    ))
}

/// Pre-emptive wait after a response that left the bucket below `threshold`:
/// `ceil((threshold - available) / restore_rate)` whole seconds.
pub fn cooldown_for(state: &ThrottleState, threshold: f64) -> Option<Duration> {
    if !state.is_below(threshold) {
        return None;
    }
    let secs = (state.deficit(threshold) / state.restore_rate).ceil();
    Some(Duration::from_secs(secs as u64))
}

/// Sleep between two batches: at least the configured minimum, stretched to
/// `ceil((threshold - available) / restore_rate * 1000)` ms when the bucket
/// is below the threshold.
pub fn pacing_delay(state: &ThrottleState, config: &RateLimitConfig) -> Duration {
    let min_delay = config.min_batch_delay();
    if !state.is_below(config.throttle_threshold) {
        return min_delay;
    }
    let extra_ms = (state.deficit(config.throttle_threshold) / state.restore_rate * 1000.0).ceil();
    min_delay.max(Duration::from_millis(extra_ms as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(available: f64, restore_rate: f64) -> Value {
        json!({
            "cost": {
                "requestedQueryCost": 52,
                "actualQueryCost": 12,
                "throttleStatus": {
                    "maximumAvailable": 2000.0,
                    "currentlyAvailable": available,
                    "restoreRate": restore_rate
                }
            }
        })
    }

    #[test]
    fn test_observe_replaces_state() {
        let mut tracker = ThrottleTracker::new();
        let state = tracker.observe(Some(&report(1988.0, 100.0)));
        assert_eq!(state, Some(tracker.current_state()));
        assert_eq!(tracker.current_state().available, 1988.0);
        assert_eq!(tracker.current_state().maximum_available, 2000.0);
    }

    #[test]
    fn test_observe_without_report_keeps_stale_state() {
        let mut tracker = ThrottleTracker::new();
        tracker.observe(Some(&report(40.0, 100.0)));
        assert_eq!(tracker.observe(None), None);
        assert_eq!(tracker.observe(Some(&json!({"foo": 1}))), None);
        assert_eq!(tracker.current_state().available, 40.0);
    }

    #[test]
    fn test_observe_allows_budget_to_rise() {
        let mut tracker = ThrottleTracker::new();
        tracker.observe(Some(&report(10.0, 50.0)));
        tracker.observe(Some(&report(1500.0, 50.0)));
        assert_eq!(tracker.current_state().available, 1500.0);
    }

    #[test]
    fn test_cooldown_rounds_up_to_whole_seconds() {
        let state = ThrottleState::reported(Some(50.0), Some(25.0), Some(1000.0));
        assert_eq!(cooldown_for(&state, 100.0), Some(Duration::from_secs(2)));

        let state = ThrottleState::reported(Some(99.0), Some(50.0), Some(1000.0));
        assert_eq!(cooldown_for(&state, 100.0), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_no_cooldown_at_or_above_threshold() {
        let state = ThrottleState::reported(Some(100.0), Some(50.0), Some(1000.0));
        assert_eq!(cooldown_for(&state, 100.0), None);
    }

    #[test]
    fn test_pacing_uses_minimum_when_budget_healthy() {
        let config = RateLimitConfig::default();
        assert_eq!(pacing_delay(&ThrottleState::default(), &config), Duration::from_millis(500));
    }

    #[test]
    fn test_pacing_stretches_when_budget_low() {
        let config = RateLimitConfig::default();
        let state = ThrottleState::reported(Some(50.0), Some(25.0), Some(1000.0));
        assert_eq!(pacing_delay(&state, &config), Duration::from_millis(2000));

        // 10 points short at 50/s is 200ms, below the 500ms floor
        let state = ThrottleState::reported(Some(90.0), Some(50.0), Some(1000.0));
        assert_eq!(pacing_delay(&state, &config), Duration::from_millis(500));
    }
}
