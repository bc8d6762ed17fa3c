//! Background launcher for scenario runs
//!
//! Every run is registered under a [`RunId`], spawned on the tokio runtime
//! (so it outlives the request that triggered it) and can be queried or
//! cancelled afterwards. At most `max_running` runs execute at once; up to
//! `max_queued` more wait as `Pending`. Beyond that, launches are rejected.

use crate::client::OrderApi;
use crate::error::LaunchError;
use crate::params::ScenarioParameters;
use crate::random::SeededRandom;
use crate::runner::{RunCounters, RunProgress, ScenarioRunner};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};
use types::ids::RunId;

/// Limits applied by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Runs executing concurrently
    pub max_running: usize,
    /// Runs allowed to wait for a free slot
    pub max_queued: usize,
    /// Finished runs kept for inspection
    pub history_limit: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_running: 4,
            max_queued: 16,
            history_limit: 64,
        }
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// Waiting for a free slot
    Pending,
    Running,
    Completed { summary: RunCounters },
    Cancelled { summary: RunCounters },
    /// The run crashed (unpaceable parameters or a panic)
    Failed { reason: String },
}

impl RunStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, RunStatus::Pending | RunStatus::Running)
    }
}

struct RunEntry {
    id: RunId,
    params: ScenarioParameters,
    created_at: DateTime<Utc>,
    status: watch::Sender<RunStatus>,
    progress: RunProgress,
    cancel: CancellationToken,
}

impl RunEntry {
    fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            id: self.id,
            params: self.params,
            created_at: self.created_at,
            status: self.status.borrow().clone(),
            progress: self.progress.snapshot(),
        }
    }
}

/// Point-in-time view of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub id: RunId,
    pub params: ScenarioParameters,
    pub created_at: DateTime<Utc>,
    pub status: RunStatus,
    pub progress: RunCounters,
}

/// Returned by [`ScenarioSupervisor::launch`]. Dropping it does not affect
/// the run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    id: RunId,
    status: watch::Receiver<RunStatus>,
    cancel: CancellationToken,
}

impl RunHandle {
    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn status(&self) -> RunStatus {
        self.status.borrow().clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait until the run reaches a terminal status.
    pub async fn wait(&mut self) -> RunStatus {
        if let Ok(status) = self.status.wait_for(RunStatus::is_finished).await {
            return status.clone();
        }
        // Sender gone: the last published value is final.
        self.status.borrow().clone()
    }
}

/// Decrements the in-flight count when a run's supervising task ends.
struct InFlightSlot(Arc<AtomicUsize>);

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Launches, tracks and cancels scenario runs.
pub struct ScenarioSupervisor {
    runner: ScenarioRunner,
    config: SupervisorConfig,
    runs: DashMap<RunId, Arc<RunEntry>>,
    slots: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    shutdown: CancellationToken,
}

impl ScenarioSupervisor {
    pub fn new(api: Arc<dyn OrderApi>, config: SupervisorConfig) -> Self {
        Self {
            runner: ScenarioRunner::new(api),
            config,
            runs: DashMap::new(),
            slots: Arc::new(Semaphore::new(config.max_running.max(1))),
            in_flight: Arc::new(AtomicUsize::new(0)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Start a run in the background and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(&self, params: ScenarioParameters) -> Result<RunHandle, LaunchError> {
        if self.shutdown.is_cancelled() {
            return Err(LaunchError::ShuttingDown);
        }

        let limit = self.config.max_running.max(1) + self.config.max_queued;
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < limit).then_some(n + 1))
            .map_err(|in_flight| LaunchError::AtCapacity { in_flight, limit })?;
        let slot = InFlightSlot(self.in_flight.clone());

        let id = RunId::new();
        let (status_tx, status_rx) = watch::channel(RunStatus::Pending);
        let entry = Arc::new(RunEntry {
            id,
            params,
            created_at: Utc::now(),
            status: status_tx,
            progress: RunProgress::new(),
            cancel: self.shutdown.child_token(),
        });

        let handle = RunHandle {
            id,
            status: status_rx,
            cancel: entry.cancel.clone(),
        };

        self.runs.insert(id, entry.clone());
        self.prune_history();

        info!(
            run_id = %id,
            order_count = params.order_count,
            reprocess_ratio = params.reprocess_ratio,
            duration_seconds = params.duration_seconds,
            "Scenario run launched"
        );

        let span = info_span!("scenario_run", run_id = %id);
        tokio::spawn(
            supervise(self.runner.clone(), entry, self.slots.clone(), slot).instrument(span),
        );

        Ok(handle)
    }

    pub fn get(&self, id: &RunId) -> Option<RunSnapshot> {
        self.runs.get(id).map(|entry| entry.snapshot())
    }

    /// All known runs, newest first.
    pub fn list(&self) -> Vec<RunSnapshot> {
        let mut runs: Vec<RunSnapshot> = self.runs.iter().map(|entry| entry.snapshot()).collect();
        runs.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        runs
    }

    /// Cancel a pending or running run. Returns false for unknown or
    /// already finished runs.
    pub fn cancel(&self, id: &RunId) -> bool {
        match self.runs.get(id) {
            Some(entry) if !entry.status.borrow().is_finished() => {
                entry.cancel.cancel();
                info!(run_id = %id, "Scenario run cancellation requested");
                true
            }
            _ => false,
        }
    }

    /// Number of runs pending or running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Cancel every run and refuse new launches.
    pub fn shutdown(&self) {
        info!(in_flight = self.in_flight(), "Shutting down scenario supervisor");
        self.shutdown.cancel();
    }

    /// Token cancelled when the supervisor shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn prune_history(&self) {
        let mut finished: Vec<RunId> = self
            .runs
            .iter()
            .filter(|entry| entry.status.borrow().is_finished())
            .map(|entry| *entry.key())
            .collect();

        if finished.len() <= self.config.history_limit {
            return;
        }

        finished.sort_unstable();
        let excess = finished.len() - self.config.history_limit;
        for id in finished.into_iter().take(excess) {
            self.runs.remove(&id);
        }
    }
}

/// Waits for a slot, runs the scenario on its own task and records the
/// outcome. A run that errors or panics is reported as `Failed` here and
/// goes no further.
async fn supervise(
    runner: ScenarioRunner,
    entry: Arc<RunEntry>,
    slots: Arc<Semaphore>,
    _slot: InFlightSlot,
) {
    let permit = tokio::select! {
        biased;
        _ = entry.cancel.cancelled() => {
            info!("Scenario run cancelled while queued");
            entry.status.send_replace(RunStatus::Cancelled { summary: RunCounters::default() });
            return;
        }
        permit = slots.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => {
                entry.status.send_replace(RunStatus::Failed {
                    reason: "scenario slots closed".to_string(),
                });
                return;
            }
        },
    };

    entry.status.send_replace(RunStatus::Running);

    let run_entry = entry.clone();
    let task = tokio::spawn(
        async move {
            let mut rng = SeededRandom::for_seed(run_entry.params.seed);
            runner
                .run(&run_entry.params, &mut rng, &run_entry.progress, &run_entry.cancel)
                .await
        }
        .in_current_span(),
    );

    let status = match task.await {
        Ok(Ok(summary)) if summary.cancelled => RunStatus::Cancelled {
            summary: summary.counters,
        },
        Ok(Ok(summary)) => RunStatus::Completed {
            summary: summary.counters,
        },
        Ok(Err(e)) => {
            error!(error = %e, "Scenario run crashed");
            RunStatus::Failed {
                reason: e.to_string(),
            }
        }
        Err(join_error) => {
            error!(error = %join_error, "Scenario run crashed");
            let reason = if join_error.is_panic() {
                "scenario run panicked"
            } else {
                "scenario run aborted"
            };
            RunStatus::Failed {
                reason: reason.to_string(),
            }
        }
    };

    drop(permit);
    entry.status.send_replace(status);
}
