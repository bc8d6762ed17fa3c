//! Load Simulator
//!
//! Generates demo traffic against the order API: creates orders at a fixed
//! pace, probabilistically asks for some of them to be reprocessed, and runs
//! each scenario in the background so the trigger never waits for it.
//!
//! # Architecture
//!
//! ```text
//!  Seed trigger ──┐
//!                 ├──► ScenarioSupervisor ──► ScenarioRunner ──► OrderApi ──► target API
//!  On-demand  ────┘      (bounded, tracked,     (paced loop,      (reqwest,
//!                         cancellable runs)      never fails)      timeouts)
//! ```
//!
//! # Modules
//! - `params`: Scenario parameters, normalization and pacing math
//! - `client`: HTTP client adapter for the order API
//! - `random`: Injectable, seedable random source for reprocess draws
//! - `runner`: The paced scenario loop
//! - `supervisor`: Background launcher with run registry and cancellation
//! - `trigger`: Startup seed and on-demand entry points
//! - `error`: Error taxonomy

pub mod client;
pub mod error;
pub mod params;
pub mod random;
pub mod runner;
pub mod supervisor;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiResponse, HttpOrderApi, OrderApi, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ClientError, LaunchError, RunError};
pub use params::{ScenarioParameters, MINIMUM_SLEEP};
pub use random::{RandomSource, SeededRandom};
pub use runner::{RunCounters, RunProgress, RunSummary, ScenarioRunner};
pub use supervisor::{RunHandle, RunSnapshot, RunStatus, ScenarioSupervisor, SupervisorConfig};
pub use trigger::{trigger_on_demand, OnDemandRequest, SeedTrigger, SEED_WARMUP_DELAY};
