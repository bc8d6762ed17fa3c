use clap::Parser;
use load_simulator::SupervisorConfig;
use std::net::SocketAddr;

/// Every option can also be set through the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "api-service")]
#[command(about = "Observable Orders API with a built-in load simulator")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: SocketAddr,

    /// Base URL the load simulator sends orders to
    #[arg(long, env = "SELF_BASE_URL", default_value = "http://localhost:8000")]
    pub self_base_url: String,

    /// Base URL of the worker service used for reprocessing
    #[arg(long, env = "WORKER_URL", default_value = "http://localhost:8001")]
    pub worker_url: String,

    /// Warm-up delay before the seed scenario starts
    #[arg(long, env = "SEED_DELAY_SECS", default_value_t = 5)]
    pub seed_delay_secs: u64,

    /// Skip the seed scenario at startup
    #[arg(long, env = "NO_SEED")]
    pub no_seed: bool,

    /// Scenario runs executing at once
    #[arg(long, env = "MAX_RUNNING_SCENARIOS", default_value_t = 4)]
    pub max_running_scenarios: usize,

    /// Scenario runs allowed to wait for a free slot
    #[arg(long, env = "MAX_QUEUED_SCENARIOS", default_value_t = 16)]
    pub max_queued_scenarios: usize,
}

impl Config {
    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            max_running: self.max_running_scenarios,
            max_queued: self.max_queued_scenarios,
            ..SupervisorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "api-service",
            "--bind-addr",
            "127.0.0.1:9000",
            "--self-base-url",
            "http://orders.internal:9000",
            "--no-seed",
            "--max-running-scenarios",
            "2",
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.self_base_url, "http://orders.internal:9000");
        assert!(config.no_seed);
        assert_eq!(config.supervisor_config().max_running, 2);
        assert_eq!(
            config.supervisor_config().history_limit,
            SupervisorConfig::default().history_limit
        );
    }

    #[test]
    fn test_rejects_bad_bind_addr() {
        assert!(Config::try_parse_from(["api-service", "--bind-addr", "nowhere"]).is_err());
    }
}
