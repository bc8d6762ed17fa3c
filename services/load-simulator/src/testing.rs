//! In-process fakes shared by the unit tests.

use crate::client::{ApiResponse, OrderApi};
use crate::error::ClientError;
use crate::random::RandomSource;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Scripted outcome of one `create_order` call.
pub(crate) enum Step {
    Respond(ApiResponse),
    Fail(ClientError),
    Panic,
}

/// Fake order API. Unscripted calls succeed with incrementing order ids.
#[derive(Default)]
pub(crate) struct FakeOrderApi {
    script: Mutex<VecDeque<Step>>,
    next_id: AtomicU64,
    create_calls: AtomicU64,
    reprocessed: Mutex<Vec<String>>,
    reprocess_fails: bool,
}

impl FakeOrderApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn scripted(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            ..Self::default()
        }
    }

    pub(crate) fn failing_reprocess() -> Self {
        Self {
            reprocess_fails: true,
            ..Self::default()
        }
    }

    pub(crate) fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn reprocessed(&self) -> Vec<String> {
        self.reprocessed.lock().unwrap().clone()
    }
}

pub(crate) fn created(order_id: &str) -> ApiResponse {
    ApiResponse::new(200, json!({ "order_id": order_id, "status": "processed", "value": 42 }))
}

#[async_trait]
impl OrderApi for FakeOrderApi {
    async fn create_order(&self) -> Result<ApiResponse, ClientError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Panic) => panic!("fake order api exploded"),
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(created(&format!("order-{}", id)))
            }
        }
    }

    async fn reprocess(&self, order_id: &str) -> Result<ApiResponse, ClientError> {
        self.reprocessed.lock().unwrap().push(order_id.to_string());
        if self.reprocess_fails {
            return Err(ClientError::Connect {
                url: format!("http://fake/orders/{}/reprocess", order_id),
                message: "connection refused".to_string(),
            });
        }
        Ok(ApiResponse::new(
            200,
            json!({ "status": "reprocess_requested", "order_id": order_id }),
        ))
    }
}

/// Random source replaying a fixed list of draws, then repeating the last.
pub(crate) struct ScriptedRandom {
    draws: Vec<f64>,
    position: usize,
}

impl ScriptedRandom {
    pub(crate) fn new(draws: Vec<f64>) -> Self {
        Self { draws, position: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.draws[self.position.min(self.draws.len() - 1)];
        self.position += 1;
        value
    }
}
