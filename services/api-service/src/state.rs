use crate::store::{InMemoryOrderStore, OrderStore};
use load_simulator::ScenarioSupervisor;
use rand::Rng;
use reqwest::Client;
use rust_decimal::Decimal;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderStore>,
    pub behavior: OrderBehavior,
    pub http_client: Client,
    pub worker_url: String, // Base URL of the worker service (POST /process)
    pub simulator: Arc<ScenarioSupervisor>,
}

impl AppState {
    pub fn new(worker_url: String, simulator: Arc<ScenarioSupervisor>) -> Self {
        Self {
            orders: Arc::new(InMemoryOrderStore::new()),
            behavior: OrderBehavior::default(),
            http_client: Client::new(),
            worker_url: worker_url.trim_end_matches('/').to_string(),
            simulator,
        }
    }

    pub fn with_behavior(mut self, behavior: OrderBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

/// Knobs of the fake order processing.
#[derive(Debug, Clone)]
pub struct OrderBehavior {
    /// Order value in whole USD
    pub value_usd: RangeInclusive<i64>,
    /// Simulated processing latency in milliseconds
    pub latency_ms: RangeInclusive<u64>,
    /// Probability that processing fails
    pub failure_rate: f64,
}

impl Default for OrderBehavior {
    fn default() -> Self {
        Self {
            value_usd: 10..=500,
            latency_ms: 50..=250,
            failure_rate: 0.2,
        }
    }
}

/// One draw of the fake processing outcome.
pub struct ProcessingDraw {
    pub value: Decimal,
    pub latency: Duration,
    pub failed: bool,
}

impl OrderBehavior {
    pub fn draw(&self) -> ProcessingDraw {
        let mut rng = rand::thread_rng();
        ProcessingDraw {
            value: Decimal::from(rng.gen_range(self.value_usd.clone())),
            latency: Duration::from_millis(rng.gen_range(self.latency_ms.clone())),
            failed: rng.gen_bool(self.failure_rate.clamp(0.0, 1.0)),
        }
    }
}
