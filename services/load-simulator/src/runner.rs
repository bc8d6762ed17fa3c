//! Paced scenario loop
//!
//! One run models a single client placing orders one at a time: create an
//! order, maybe reprocess it, sleep for the pacing interval, repeat. A failed
//! iteration is logged and counted, and the loop moves on.

use crate::client::{ApiResponse, OrderApi};
use crate::error::{IterationError, RunError};
use crate::params::{effective_sleep, ScenarioParameters};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Counters of a run, as observed at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub orders_attempted: u64,
    pub orders_created: u64,
    pub orders_failed: u64,
    pub reprocess_attempted: u64,
    pub reprocess_failed: u64,
}

/// Live counters, updated by the runner and readable from other tasks.
#[derive(Debug, Default)]
pub struct RunProgress {
    orders_attempted: AtomicU64,
    orders_created: AtomicU64,
    orders_failed: AtomicU64,
    reprocess_attempted: AtomicU64,
    reprocess_failed: AtomicU64,
}

impl RunProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> RunCounters {
        RunCounters {
            orders_attempted: self.orders_attempted.load(Ordering::Relaxed),
            orders_created: self.orders_created.load(Ordering::Relaxed),
            orders_failed: self.orders_failed.load(Ordering::Relaxed),
            reprocess_attempted: self.reprocess_attempted.load(Ordering::Relaxed),
            reprocess_failed: self.reprocess_failed.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Final result of a run that was not aborted by a top-level error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub counters: RunCounters,
    /// The run was stopped by its cancellation token before finishing.
    pub cancelled: bool,
}

/// Fields the runner reads from a `POST /orders` body.
///
/// Missing, empty or non-string `order_id` means "no identifier": the order
/// is logged but never reprocessed.
#[derive(Debug, Default, PartialEq)]
struct CreatedOrder {
    order_id: Option<String>,
    status: Option<String>,
}

impl CreatedOrder {
    fn from_response(response: &ApiResponse) -> Result<Self, IterationError> {
        let Value::Object(fields) = &response.body else {
            return Err(IterationError::MalformedBody {
                reason: format!("expected a JSON object, got {}", json_kind(&response.body)),
            });
        };

        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };

        Ok(Self {
            order_id: text("order_id"),
            status: text("status"),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "no JSON body",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn cancelled_at(index: u32, progress: &RunProgress) -> RunSummary {
    let counters = progress.snapshot();
    warn!(
        index,
        orders_attempted = counters.orders_attempted,
        "Load scenario cancelled"
    );
    RunSummary {
        counters,
        cancelled: true,
    }
}

/// Executes scenarios against an [`OrderApi`].
#[derive(Clone)]
pub struct ScenarioRunner {
    api: Arc<dyn OrderApi>,
}

impl ScenarioRunner {
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self { api }
    }

    /// Run one scenario to completion (or cancellation).
    ///
    /// Per-order failures never escape: they are logged, counted in
    /// `progress` and the loop continues. The only error returned is a run
    /// that cannot be paced at all.
    ///
    /// The pacing sleep follows every iteration, the last one included.
    /// Cancellation is observed there and before each order.
    pub async fn run(
        &self,
        params: &ScenarioParameters,
        rng: &mut dyn RandomSource,
        progress: &RunProgress,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, RunError> {
        if params.is_noop() {
            info!(
                order_count = params.order_count,
                reprocess_ratio = params.reprocess_ratio,
                duration_seconds = params.duration_seconds,
                "Load scenario has nothing to do"
            );
            return Ok(RunSummary::default());
        }

        let interval = params.pacing_interval()?;
        let pause = effective_sleep(interval);
        info!(
            order_count = params.order_count,
            reprocess_ratio = params.reprocess_ratio,
            duration_seconds = params.duration_seconds,
            interval_secs = interval.as_secs_f64(),
            "Starting load scenario"
        );

        for index in 0..params.order_count {
            if cancel.is_cancelled() {
                return Ok(cancelled_at(index, progress));
            }

            if let Err(e) = self.place_order(index, params.reprocess_ratio, rng, progress).await {
                if e.is_order_failure() {
                    RunProgress::bump(&progress.orders_failed);
                }
                error!(index, error = %e, "Error in load scenario");
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(cancelled_at(index, progress)),
                _ = tokio::time::sleep(pause) => {}
            }
        }

        let counters = progress.snapshot();
        info!(
            orders_attempted = counters.orders_attempted,
            orders_created = counters.orders_created,
            orders_failed = counters.orders_failed,
            reprocess_attempted = counters.reprocess_attempted,
            reprocess_failed = counters.reprocess_failed,
            "Load scenario finished"
        );
        Ok(RunSummary {
            counters,
            cancelled: false,
        })
    }

    async fn place_order(
        &self,
        index: u32,
        reprocess_ratio: f64,
        rng: &mut dyn RandomSource,
        progress: &RunProgress,
    ) -> Result<(), IterationError> {
        RunProgress::bump(&progress.orders_attempted);
        let response = self.api.create_order().await?;

        if !response.is_success() {
            RunProgress::bump(&progress.orders_failed);
            error!(
                index,
                status_code = response.status,
                "Load scenario /orders returned a non-success status"
            );
            return Ok(());
        }

        let order = CreatedOrder::from_response(&response)?;
        RunProgress::bump(&progress.orders_created);
        info!(
            index,
            order_id = order.order_id.as_deref().unwrap_or("<none>"),
            status = order.status.as_deref().unwrap_or("<none>"),
            "Load scenario created order"
        );

        let Some(order_id) = order.order_id else {
            return Ok(());
        };
        if rng.next_unit() >= reprocess_ratio {
            return Ok(());
        }

        RunProgress::bump(&progress.reprocess_attempted);
        match self.api.reprocess(&order_id).await {
            Ok(response) => {
                if !response.is_success() {
                    RunProgress::bump(&progress.reprocess_failed);
                }
                info!(
                    order_id = %order_id,
                    status_code = response.status,
                    "Load scenario reprocessed order"
                );
                Ok(())
            }
            Err(source) => {
                RunProgress::bump(&progress.reprocess_failed);
                Err(IterationError::Reprocess { order_id, source })
            }
        }
    }
}
