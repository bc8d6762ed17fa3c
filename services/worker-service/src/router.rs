use crate::process::{process_order, WorkerBehavior};
use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use types::health::HealthResponse;

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub fn create_router(behavior: WorkerBehavior) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/process", post(process_order))
        .layer(TraceLayer::new_for_http())
        .with_state(behavior)
}
