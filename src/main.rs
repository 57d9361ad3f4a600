use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use tracing_subscriber::EnvFilter;

use predict_lite::config::{ModelConfig, ServiceConfig};
use predict_lite::service::PredictionService;
use predict_lite::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "predict-lite")]
#[command(version)]
#[command(about = "A prediction service with synchronous and queued asynchronous execution")]
struct Args {
    /// Address to bind the HTTP API to (IPv4 or IPv6)
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port for the HTTP API
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Number of background workers processing async predictions
    #[arg(long, default_value = "1")]
    workers: usize,

    // === Mock Model Options ===
    /// Minimum simulated model latency in milliseconds
    #[arg(long, default_value = "8000")]
    min_delay_ms: u64,

    /// Maximum simulated model latency in milliseconds
    #[arg(long, default_value = "15000")]
    max_delay_ms: u64,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listen_addr = SocketAddr::new(args.host, args.port);

    let config = ServiceConfig {
        listen_addr,
        worker_count: args.workers,
        model: ModelConfig {
            min_delay_ms: args.min_delay_ms,
            max_delay_ms: args.max_delay_ms,
            ..ModelConfig::default()
        },
    };

    tracing::info!(
        listen_addr = %config.listen_addr,
        workers = config.worker_count,
        min_delay_ms = config.model.min_delay_ms,
        max_delay_ms = config.model.max_delay_ms,
        "Starting predict-lite"
    );

    let shutdown = install_shutdown_handler()?;
    let service = PredictionService::new(config)?;
    service.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_address() {
        let args = Args::try_parse_from(["predict-lite"]).unwrap();
        assert_eq!(
            SocketAddr::new(args.host, args.port),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_ipv6_host() {
        let args =
            Args::try_parse_from(["predict-lite", "--host", "::1", "--port", "9000"]).unwrap();
        let addr = SocketAddr::new(args.host, args.port);
        assert!(addr.is_ipv6());
        assert_eq!(addr.to_string(), "[::1]:9000");
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert!(Args::try_parse_from(["predict-lite", "--host", "localhost:80"]).is_err());
    }
}
