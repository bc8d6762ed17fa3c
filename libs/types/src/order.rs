//! Order API wire types
//!
//! Bodies returned by `POST /orders`, `GET /orders/{id}` and
//! `POST /orders/{id}/reprocess`.

use crate::ids::OrderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the (simulated) order processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Processing succeeded
    Processed,
    /// Processing failed and the order is a reprocess candidate
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processed => "processed",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A created order as stored and returned by the order API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub status: OrderStatus,
    /// Order value in USD
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// Acknowledgement returned once a reprocess request reached the worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReprocessAck {
    pub status: String,
    pub order_id: OrderId,
}

impl ReprocessAck {
    pub const REQUESTED: &'static str = "reprocess_requested";

    pub fn requested(order_id: OrderId) -> Self {
        Self {
            status: Self::REQUESTED.to_string(),
            order_id,
        }
    }
}
