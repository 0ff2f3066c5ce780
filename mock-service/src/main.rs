use clap::Parser;
use mock_service::MockConfig;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// A fake Ethereum node answering `personal_sendTransaction` on a Unix socket.
#[derive(Parser, Debug)]
#[command(version, about)]
struct MockCli {
    /// Socket path to listen on. A stale file at this path is removed first.
    #[arg(short, long)]
    socket: PathBuf,

    /// Time taken to answer each request.
    #[arg(short, long, default_value = "0ms", value_parser = humantime::parse_duration)]
    latency: Duration,

    /// Standard deviation applied to the latency.
    #[arg(short, long, value_parser = humantime::parse_duration)]
    jitter: Option<Duration>,

    /// Fraction of requests answered with an error.
    #[arg(short, long, default_value_t = 0.)]
    failure_rate: f64,

    /// Requests beyond this rate are answered with an error.
    #[arg(short, long)]
    max_tps: Option<NonZeroU32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_service=info"));
    FmtSubscriber::builder().with_env_filter(filter).init();

    let cli = MockCli::parse();
    let config = MockConfig {
        latency: cli.latency,
        jitter: cli.jitter,
        failure_rate: cli.failure_rate,
        max_tps: cli.max_tps,
    };

    mock_service::run(&cli.socket, config).await
}
