use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::errors::OrderError;
use types::ids::OrderId;
use types::order::{OrderReceipt, OrderStatus, ReprocessAck};
use types::worker::WorkerRequest;

/// Create a fake order with a random value and a random chance of failure.
pub async fn create_order(State(state): State<AppState>) -> Json<OrderReceipt> {
    let draw = state.behavior.draw();
    let order_id = OrderId::new();

    // Simulated processing latency
    tokio::time::sleep(draw.latency).await;

    let status = if draw.failed {
        tracing::error!(order_id = %order_id, "Order processing failed");
        OrderStatus::Failed
    } else {
        tracing::info!(order_id = %order_id, "Order created successfully");
        OrderStatus::Processed
    };

    let receipt = OrderReceipt {
        order_id,
        status,
        value: draw.value,
    };
    state.orders.insert(receipt.clone());
    tracing::debug!(stored = state.orders.len(), "Order stored");

    Json(receipt)
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderReceipt>, AppError> {
    let order_id = OrderId::parse(&order_id)?;
    let receipt = state
        .orders
        .get(&order_id)
        .ok_or_else(|| OrderError::NotFound {
            order_id: order_id.to_string(),
        })?;

    Ok(Json(receipt))
}

/// Ask the worker service to process a stored order again.
pub async fn reprocess_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<ReprocessAck>, AppError> {
    let order_id = OrderId::parse(&order_id)?;
    if state.orders.get(&order_id).is_none() {
        return Err(OrderError::NotFound {
            order_id: order_id.to_string(),
        }
        .into());
    }

    // Forward to the worker
    // POST /process
    let res = state
        .http_client
        .post(format!("{}/process", state.worker_url))
        .json(&WorkerRequest {
            order_id: order_id.to_string(),
        })
        .send()
        .await
        .and_then(|res| res.error_for_status())
        .map_err(|e| {
            tracing::error!(order_id = %order_id, error = %e, "Failed to call worker-service");
            AppError::WorkerFailed(e.to_string())
        })?;

    tracing::info!(
        order_id = %order_id,
        worker_status = res.status().as_u16(),
        "Reprocess request sent to worker"
    );

    Ok(Json(ReprocessAck::requested(order_id)))
}
