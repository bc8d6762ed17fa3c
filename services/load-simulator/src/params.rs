//! Scenario parameters and pacing math
//!
//! A scenario spreads `order_count` order creations evenly over
//! `duration_seconds`. The gap between two attempts is
//! `duration_seconds / order_count`, floored at [`MINIMUM_SLEEP`] so a tiny
//! duration never turns the loop into a request storm.

use crate::error::RunError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Floor applied to the pacing sleep between two iterations.
pub const MINIMUM_SLEEP: Duration = Duration::from_millis(10);

/// Inputs of one scenario run. Fixed once the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Number of orders to create
    pub order_count: u32,
    /// Probability in [0, 1] that a created order gets reprocessed
    pub reprocess_ratio: f64,
    /// Target wall-clock length of the run
    pub duration_seconds: f64,
    /// Seed for the reprocess draws. Unseeded runs draw from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ScenarioParameters {
    /// Build parameters from raw inputs, clamping the order count to
    /// `[0, u32::MAX]` and the ratio to `[0, 1]`.
    pub fn new(order_count: i64, reprocess_ratio: f64, duration_seconds: f64) -> Self {
        Self {
            order_count: order_count.clamp(0, u32::MAX as i64) as u32,
            reprocess_ratio: clamp_ratio(reprocess_ratio),
            duration_seconds,
            seed: None,
        }
    }

    /// Build parameters from a reprocess percentage in `[0, 100]`.
    /// Out-of-range percentages are clamped.
    pub fn from_percent(order_count: i64, reprocess_percent: f64, duration_seconds: f64) -> Self {
        Self::new(order_count, reprocess_percent / 100.0, duration_seconds)
    }

    /// The fixed scenario launched once after startup.
    pub fn seed_run() -> Self {
        Self::new(20, 0.6, 30.0)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// A run with no orders or a non-positive (or NaN) duration does nothing.
    pub fn is_noop(&self) -> bool {
        self.order_count == 0 || !(self.duration_seconds > 0.0)
    }

    /// Target gap between two order-creation attempts.
    pub fn pacing_interval(&self) -> Result<Duration, RunError> {
        let seconds = self.duration_seconds / f64::from(self.order_count);
        Duration::try_from_secs_f64(seconds).map_err(|_| RunError::InvalidPacing {
            order_count: self.order_count,
            duration_seconds: self.duration_seconds,
        })
    }
}

/// Realized sleep for a given pacing interval.
pub fn effective_sleep(interval: Duration) -> Duration {
    interval.max(MINIMUM_SLEEP)
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}
