//! Leaky-bucket budget as reported by the Admin API.

use serde::{Deserialize, Serialize};

/// Points currently available in the remote cost bucket.
///
/// `0 <= available <= maximum_available` and `restore_rate > 0` hold for every
/// value produced by [`ThrottleState::reported`] and [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleState {
    /// Points left in the bucket
    pub available: f64,
    /// Points restored per second
    pub restore_rate: f64,
    /// Bucket capacity
    pub maximum_available: f64,
}

impl ThrottleState {
    pub const DEFAULT_AVAILABLE: f64 = 1000.0;
    pub const DEFAULT_RESTORE_RATE: f64 = 50.0;
    pub const DEFAULT_MAXIMUM: f64 = 1000.0;

    /// Build a state from a throttle report, substituting defaults for
    /// missing fields and clamping into the invariant range.
    pub fn reported(
        available: Option<f64>,
        restore_rate: Option<f64>,
        maximum_available: Option<f64>,
    ) -> Self {
        let maximum_available = maximum_available
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(Self::DEFAULT_MAXIMUM);
        let restore_rate = restore_rate
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(Self::DEFAULT_RESTORE_RATE);
        let available = available
            .filter(|a| a.is_finite())
            .unwrap_or(Self::DEFAULT_AVAILABLE)
            .clamp(0.0, maximum_available);
        Self { available, restore_rate, maximum_available }
    }

    /// Whether the bucket has dropped below `threshold` points.
    pub fn is_below(&self, threshold: f64) -> bool {
        self.available < threshold
    }

    /// Points missing to get back up to `threshold`, zero when already above.
    pub fn deficit(&self, threshold: f64) -> f64 {
        (threshold - self.available).max(0.0)
    }
}

impl Default for ThrottleState {
    fn default() -> Self {
        Self {
            available: Self::DEFAULT_AVAILABLE,
            restore_rate: Self::DEFAULT_RESTORE_RATE,
            maximum_available: Self::DEFAULT_MAXIMUM,
        }
    }
}
