use anyhow::Context;
use clap::Parser;
use ethbench::{Cli, IpcConnector};
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ethbench=info"));
    FmtSubscriber::builder().with_env_filter(filter).init();

    let cli = Cli::parse();
    let json = cli.json;

    #[cfg(feature = "metrics")]
    if let Some(addr) = cli.metrics_addr {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Unable to install the Prometheus exporter")?;
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return Ok(());
        }
    };

    let stats = ethbench::run(&IpcConnector, config, interrupted()).await?;

    if json {
        let out = serde_json::to_string_pretty(&stats).context("Unable to serialize report")?;
        println!("{out}");
    }

    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the run is simply never interrupted.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for interrupts: {err}");
        std::future::pending::<()>().await;
    }
}
