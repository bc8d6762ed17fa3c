use crate::handlers::{health, order, simulate};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let order_routes = Router::new()
        .route("/orders", post(order::create_order))
        .route("/orders/{order_id}", get(order::get_order))
        .route("/orders/{order_id}/reprocess", post(order::reprocess_order));

    let simulate_routes = Router::new()
        .route("/simulate", get(simulate::simulate_form))
        .route("/simulate/run", post(simulate::run_simulation))
        .route("/simulate/runs", get(simulate::list_runs))
        .route("/simulate/runs/{run_id}", get(simulate::get_run))
        .route("/simulate/runs/{run_id}/cancel", post(simulate::cancel_run));

    Router::new()
        .route("/health", get(health::health))
        .merge(order_routes)
        .merge(simulate_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OrderBehavior;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use load_simulator::{
        ApiResponse, ClientError, OrderApi, ScenarioSupervisor, SupervisorConfig,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Target that answers instantly, so runs only cost their pacing sleeps.
    struct InstantTarget;

    #[async_trait]
    impl OrderApi for InstantTarget {
        async fn create_order(&self) -> Result<ApiResponse, ClientError> {
            Ok(ApiResponse::new(200, json!({ "order_id": "o-1", "status": "processed" })))
        }

        async fn reprocess(&self, _order_id: &str) -> Result<ApiResponse, ClientError> {
            Ok(ApiResponse::new(200, json!({ "status": "reprocess_requested" })))
        }
    }

    fn test_state(config: SupervisorConfig) -> AppState {
        let simulator = Arc::new(ScenarioSupervisor::new(Arc::new(InstantTarget), config));
        // Nothing listens on port 9 (discard), so worker calls fail fast.
        AppState::new("http://127.0.0.1:9".to_string(), simulator).with_behavior(OrderBehavior {
            latency_ms: 0..=0,
            failure_rate: 0.0,
            ..OrderBehavior::default()
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state(SupervisorConfig::default()));
        let response = send(&app, get_request("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_create_and_fetch_order() {
        let app = create_router(test_state(SupervisorConfig::default()));

        let response = send(&app, post_empty("/orders")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let created = json_body(response).await;
        assert_eq!(created["status"], "processed");
        let value = created["value"].as_f64().unwrap();
        assert!((10.0..=500.0).contains(&value));

        let order_id = created["order_id"].as_str().unwrap();
        let response = send(&app, get_request(&format!("/orders/{}", order_id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);
    }

    #[tokio::test]
    async fn test_unknown_orders_are_404() {
        let app = create_router(test_state(SupervisorConfig::default()));

        let response = send(&app, get_request("/orders/0190d3c8-0000-7000-8000-000000000000")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, get_request("/orders/not-an-id")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, post_empty("/orders/not-an-id/reprocess")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_reprocess_with_unreachable_worker_is_500() {
        let app = create_router(test_state(SupervisorConfig::default()));

        let created = json_body(send(&app, post_empty("/orders")).await).await;
        let order_id = created["order_id"].as_str().unwrap();

        let response = send(&app, post_empty(&format!("/orders/{}/reprocess", order_id))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "WORKER_FAILED");
    }

    #[tokio::test]
    async fn test_simulate_form_renders() {
        let app = create_router(test_state(SupervisorConfig::default()));
        let response = send(&app, get_request("/simulate")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("action=\"/simulate/run\""));
    }

    #[tokio::test]
    async fn test_run_returns_before_the_scenario_finishes() {
        let state = test_state(SupervisorConfig::default());
        let simulator = state.simulator.clone();
        let app = create_router(state);

        let response = tokio::time::timeout(
            Duration::from_secs(2),
            send(
                &app,
                post_form(
                    "/simulate/run",
                    "orders=5&reprocess_ratio=150&duration_seconds=3600",
                ),
            ),
        )
        .await
        .expect("trigger must not wait for the scenario");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8_lossy(&bytes).to_string();
        assert!(page.contains("Generating 5 orders over ~3600 seconds with ~100% reprocessed."));

        let runs = simulator.list();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].params.reprocess_ratio, 1.0);
        assert!(!runs[0].status.is_finished());

        let response = send(&app, get_request(&format!("/simulate/runs/{}", runs[0].id))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["params"]["order_count"], 5);

        let listed = json_body(send(&app, get_request("/simulate/runs")).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_run() {
        let state = test_state(SupervisorConfig::default());
        let simulator = state.simulator.clone();
        let app = create_router(state);

        send(
            &app,
            post_form("/simulate/run", "orders=10&reprocess_ratio=0&duration_seconds=600"),
        )
        .await;
        let run_id = simulator.list()[0].id;

        let response = send(&app, post_empty(&format!("/simulate/runs/{}/cancel", run_id))).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(response).await["status"], "cancelling");

        let response = send(&app, post_empty("/simulate/runs/nope/cancel")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_at_capacity_is_429() {
        let app = create_router(test_state(SupervisorConfig {
            max_running: 1,
            max_queued: 0,
            history_limit: 4,
        }));
        let form = "orders=3&reprocess_ratio=50&duration_seconds=600";

        let response = send(&app, post_form("/simulate/run", form)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, post_form("/simulate/run", form)).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json_body(response).await["error"], "TOO_MANY_RUNS");
    }

    #[tokio::test]
    async fn test_run_rejects_missing_fields() {
        let app = create_router(test_state(SupervisorConfig::default()));
        let response = send(&app, post_form("/simulate/run", "orders=3")).await;
        assert!(response.status().is_client_error());
    }
}
