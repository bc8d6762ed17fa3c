use axum::{extract::State, Json};
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;
use types::worker::{WorkerOutcome, WorkerRequest, WorkerStatus};

/// Knobs of the fake reprocessing.
#[derive(Debug, Clone)]
pub struct WorkerBehavior {
    /// Processing delay in milliseconds
    pub delay_ms: RangeInclusive<u64>,
    /// Probability that processing fails
    pub failure_rate: f64,
}

impl Default for WorkerBehavior {
    fn default() -> Self {
        Self {
            delay_ms: 100..=1000,
            failure_rate: 0.3,
        }
    }
}

impl WorkerBehavior {
    fn draw(&self) -> (Duration, bool) {
        let mut rng = rand::thread_rng();
        (
            Duration::from_millis(rng.gen_range(self.delay_ms.clone())),
            rng.gen_bool(self.failure_rate.clamp(0.0, 1.0)),
        )
    }
}

/// Failures are reported in the body; the response is always 200.
pub async fn process_order(
    State(behavior): State<WorkerBehavior>,
    Json(request): Json<WorkerRequest>,
) -> Json<WorkerOutcome> {
    let (delay, failed) = behavior.draw();
    tokio::time::sleep(delay).await;

    let status = if failed {
        tracing::error!(
            order_id = %request.order_id,
            delay_ms = delay.as_millis() as u64,
            "Worker failed processing order"
        );
        WorkerStatus::Failed
    } else {
        tracing::info!(
            order_id = %request.order_id,
            delay_ms = delay.as_millis() as u64,
            "Worker processed order"
        );
        WorkerStatus::Success
    };

    Json(WorkerOutcome {
        status,
        order_id: request.order_id,
    })
}
