//! Entry points that start scenario runs
//!
//! - The seed trigger fires one fixed scenario after a warm-up delay, so the
//!   target API has time to come up.
//! - The on-demand trigger takes user-supplied values (reprocess ratio as a
//!   percentage), normalizes them and launches without waiting.

use crate::error::LaunchError;
use crate::params::ScenarioParameters;
use crate::supervisor::{RunHandle, ScenarioSupervisor};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Delay before the seed scenario starts.
pub const SEED_WARMUP_DELAY: Duration = Duration::from_secs(5);

/// User-supplied scenario request, as submitted by the simulation form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnDemandRequest {
    pub orders: i64,
    /// Percentage in [0, 100]; clamped
    pub reprocess_ratio: f64,
    pub duration_seconds: f64,
}

impl OnDemandRequest {
    pub fn into_params(self) -> ScenarioParameters {
        ScenarioParameters::from_percent(self.orders, self.reprocess_ratio, self.duration_seconds)
    }
}

/// Normalize and launch a user-requested scenario. Returns as soon as the
/// run is registered.
pub fn trigger_on_demand(
    supervisor: &ScenarioSupervisor,
    request: OnDemandRequest,
) -> Result<RunHandle, LaunchError> {
    let params = request.into_params();
    debug!(
        orders = request.orders,
        reprocess_percent = request.reprocess_ratio,
        duration_seconds = request.duration_seconds,
        effective_ratio = params.reprocess_ratio,
        "On-demand scenario requested"
    );
    supervisor.launch(params)
}

/// Fires the seed scenario at most once.
#[derive(Debug)]
pub struct SeedTrigger {
    delay: Duration,
    params: ScenarioParameters,
    fired: AtomicBool,
}

impl SeedTrigger {
    pub fn new(delay: Duration, params: ScenarioParameters) -> Self {
        Self {
            delay,
            params,
            fired: AtomicBool::new(false),
        }
    }

    /// Spawn the delayed seed run. Only the first call does anything.
    ///
    /// The returned task ends when the seed run finishes, or early if the
    /// supervisor shuts down during the warm-up.
    pub fn spawn(&self, supervisor: Arc<ScenarioSupervisor>) -> Option<JoinHandle<()>> {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!("Seed load already triggered");
            return None;
        }

        let delay = self.delay;
        let params = self.params;
        let shutdown = supervisor.shutdown_token();

        Some(tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Shutdown before seed load started");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            info!("Starting initial seed load");
            match supervisor.launch(params) {
                Ok(mut handle) => {
                    let status = handle.wait().await;
                    info!(run_id = %handle.id(), status = ?status, "Initial seed load completed");
                }
                Err(e) => warn!(error = %e, "Initial seed load could not be launched"),
            }
        }))
    }
}

impl Default for SeedTrigger {
    fn default() -> Self {
        Self::new(SEED_WARMUP_DELAY, ScenarioParameters::seed_run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::{RunStatus, SupervisorConfig};
    use crate::testing::FakeOrderApi;

    fn supervisor(api: Arc<FakeOrderApi>) -> Arc<ScenarioSupervisor> {
        Arc::new(ScenarioSupervisor::new(api, SupervisorConfig::default()))
    }

    #[test]
    fn test_on_demand_normalization() {
        let request = OnDemandRequest {
            orders: 10,
            reprocess_ratio: 150.0,
            duration_seconds: 20.0,
        };
        assert_eq!(request.into_params().reprocess_ratio, 1.0);

        let request = OnDemandRequest { reprocess_ratio: -10.0, ..request };
        assert_eq!(request.into_params().reprocess_ratio, 0.0);

        let request = OnDemandRequest { reprocess_ratio: 60.0, ..request };
        assert_eq!(request.into_params().reprocess_ratio, 0.6);

        let request = OnDemandRequest { orders: -4, ..request };
        assert_eq!(request.into_params().order_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_demand_returns_immediately() {
        let api = Arc::new(FakeOrderApi::new());
        let sup = supervisor(api.clone());
        let request = OnDemandRequest {
            orders: 5,
            reprocess_ratio: 100.0,
            duration_seconds: 3_600.0,
        };

        let start = tokio::time::Instant::now();
        let handle = trigger_on_demand(&sup, request).unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(!handle.status().is_finished());

        let snapshot = sup.get(&handle.id()).unwrap();
        assert_eq!(snapshot.params.reprocess_ratio, 1.0);
        assert_eq!(snapshot.params.order_count, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_on_demand_runs_are_independent() {
        let api = Arc::new(FakeOrderApi::new());
        let sup = supervisor(api.clone());
        let request = OnDemandRequest {
            orders: 4,
            reprocess_ratio: 0.0,
            duration_seconds: 4.0,
        };

        let mut a = trigger_on_demand(&sup, request).unwrap();
        let mut b = trigger_on_demand(&sup, request).unwrap();
        assert_ne!(a.id(), b.id());

        assert!(matches!(a.wait().await, RunStatus::Completed { .. }));
        assert!(matches!(b.wait().await, RunStatus::Completed { .. }));
        assert_eq!(api.create_calls(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seed_fires_once_after_warmup() {
        let api = Arc::new(FakeOrderApi::new());
        let sup = supervisor(api.clone());
        let seed = SeedTrigger::new(
            Duration::from_secs(5),
            ScenarioParameters::new(2, 0.0, 2.0),
        );

        let task = seed.spawn(sup.clone()).expect("first spawn fires");
        assert!(seed.spawn(sup.clone()).is_none());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(sup.list().is_empty());

        task.await.unwrap();
        let runs = sup.list();
        assert_eq!(runs.len(), 1);
        assert!(matches!(runs[0].status, RunStatus::Completed { .. }));
        assert_eq!(api.create_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seed_skipped_on_shutdown() {
        let api = Arc::new(FakeOrderApi::new());
        let sup = supervisor(api.clone());

        let task = SeedTrigger::default().spawn(sup.clone()).unwrap();
        sup.shutdown();
        task.await.unwrap();

        assert!(sup.list().is_empty());
        assert_eq!(api.create_calls(), 0);
    }

    #[test]
    fn test_default_seed() {
        let seed = SeedTrigger::default();
        assert_eq!(seed.delay, SEED_WARMUP_DELAY);
        assert_eq!(seed.params, ScenarioParameters::seed_run());
    }
}
