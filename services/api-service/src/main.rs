mod config;
mod error;
mod handlers;
mod models;
mod pages;
mod router;
mod state;
mod store;

use clap::Parser;
use config::Config;
use load_simulator::{HttpOrderApi, ScenarioParameters, ScenarioSupervisor, SeedTrigger};
use router::create_router;
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Observable Orders API service");

    // The simulator drives traffic against this service (or whatever
    // SELF_BASE_URL points at).
    let target = HttpOrderApi::new(&config.self_base_url)?;
    let simulator = Arc::new(ScenarioSupervisor::new(
        Arc::new(target),
        config.supervisor_config(),
    ));

    let state = AppState::new(config.worker_url.clone(), simulator.clone());
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        target = %config.self_base_url,
        worker = %config.worker_url,
        "Listening"
    );

    if config.no_seed {
        tracing::info!("Seed load disabled");
    } else {
        SeedTrigger::new(
            Duration::from_secs(config.seed_delay_secs),
            ScenarioParameters::seed_run(),
        )
        .spawn(simulator.clone());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(simulator))
        .await?;

    Ok(())
}

async fn shutdown_signal(simulator: Arc<ScenarioSupervisor>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    simulator.shutdown();
}
