use crate::error::AppError;
use crate::models::CancelRunResponse;
use crate::pages;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Form, Json,
};
use load_simulator::{trigger_on_demand, OnDemandRequest, RunSnapshot};
use types::ids::RunId;

pub async fn simulate_form() -> Html<&'static str> {
    Html(pages::SIMULATE_FORM)
}

/// Launch an on-demand scenario and answer right away; the run continues in
/// the background.
pub async fn run_simulation(
    State(state): State<AppState>,
    Form(request): Form<OnDemandRequest>,
) -> Result<Html<String>, AppError> {
    let handle = trigger_on_demand(&state.simulator, request)?;
    tracing::info!(run_id = %handle.id(), "On-demand scenario started");

    Ok(Html(pages::run_started(handle.id(), &request.into_params())))
}

pub async fn list_runs(State(state): State<AppState>) -> Json<Vec<RunSnapshot>> {
    Json(state.simulator.list())
}

pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Result<Json<RunSnapshot>, AppError> {
    let run_id = parse_run_id(&run_id)?;
    state
        .simulator
        .get(&run_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Run {}", run_id)))
}

pub async fn cancel_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Result<(StatusCode, Json<CancelRunResponse>), AppError> {
    let run_id = parse_run_id(&run_id)?;
    if !state.simulator.cancel(&run_id) {
        return Err(AppError::NotFound(format!("No live run {}", run_id)));
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(CancelRunResponse {
            run_id,
            status: "cancelling".to_string(),
        }),
    ))
}

fn parse_run_id(raw: &str) -> Result<RunId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Run {}", raw)))
}
