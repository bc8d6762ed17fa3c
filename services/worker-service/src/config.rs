use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Clone, Parser)]
#[command(name = "worker-service")]
#[command(about = "Observable Orders worker that reprocesses orders")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8001")]
    pub bind_addr: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        let config = Config::try_parse_from(["worker-service"]).unwrap();
        assert_eq!(config.bind_addr.port(), 8001);
    }
}
