use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use load_simulator::LaunchError;
use serde_json::json;
use thiserror::Error;
use types::errors::OrderError;

/// Central error type for the API service
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many scenario runs: {0}")]
    TooManyRuns(String),

    #[error("Worker call failed: {0}")]
    WorkerFailed(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            // Malformed ids can never match a stored order.
            OrderError::NotFound { .. } | OrderError::InvalidId { .. } => {
                AppError::NotFound("Order not found".to_string())
            }
        }
    }
}

impl From<LaunchError> for AppError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::AtCapacity { .. } => AppError::TooManyRuns(err.to_string()),
            LaunchError::ShuttingDown => AppError::ServiceUnavailable(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            AppError::TooManyRuns(msg) => (StatusCode::TOO_MANY_REQUESTS, msg, "TOO_MANY_RUNS"),
            AppError::WorkerFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg, "WORKER_FAILED")
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                msg,
                "SERVICE_UNAVAILABLE",
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}
