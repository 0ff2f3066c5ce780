use clap::Parser;
use ethbench_core::{
    ConfigError, DispatchMode, RunConfig, DEFAULT_CONCURRENCY, DEFAULT_NUMBER, DEFAULT_RECIPIENT,
    DEFAULT_REPORT_INTERVAL,
};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(target_os = "macos")]
const DEFAULT_SOCKET_DIR: &str = "Library/Application Support/io.parity.ethereum";
#[cfg(not(target_os = "macos"))]
const DEFAULT_SOCKET_DIR: &str = ".local/share/io.parity.ethereum";

const DEFAULT_SOCKET_NAME: &str = "jsonrpc.ipc";

/// Flood Ethereum nodes with value transfers over their IPC sockets and report throughput.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Concurrent senders per endpoint.
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Calls to send per endpoint.
    #[arg(short, long, default_value_t = DEFAULT_NUMBER, conflicts_with = "duration")]
    pub number: u64,

    /// Send for this long instead of a fixed number of calls (e.g. `30s`, `5m`).
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,

    /// Account receiving the transfers.
    #[arg(long, default_value = DEFAULT_RECIPIENT)]
    pub to: String,

    /// Comma-separated IPC socket paths. Defaults to the node's standard location.
    #[arg(short, long, value_delimiter = ',')]
    pub socket: Vec<PathBuf>,

    /// Comma-separated sender accounts, one per socket.
    #[arg(value_delimiter = ',', required = true)]
    pub from: Vec<String>,

    /// How often to log throughput.
    #[arg(long, default_value_t = DEFAULT_REPORT_INTERVAL.into())]
    pub report_interval: humantime::Duration,

    /// Print the final statistics as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Serve Prometheus metrics on this address.
    #[cfg(feature = "metrics")]
    #[arg(long)]
    pub metrics_addr: Option<std::net::SocketAddr>,
}

impl Cli {
    pub fn mode(&self) -> DispatchMode {
        match self.duration {
            Some(duration) => DispatchMode::Duration(duration),
            None => DispatchMode::Count(self.number),
        }
    }

    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let mode = self.mode();
        let sockets = if self.socket.is_empty() {
            vec![default_socket_path()?]
        } else {
            self.socket
        };

        let config = RunConfig::new(sockets, self.from, &self.to)?
            .concurrency(self.concurrency)
            .mode(mode)
            .report_interval(self.report_interval.into());
        config.validate()?;
        Ok(config)
    }
}

/// The socket a locally running node listens on by default.
pub fn default_socket_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .ok_or(ConfigError::NoHomeDir)?;
    Ok(PathBuf::from(home)
        .join(DEFAULT_SOCKET_DIR)
        .join(DEFAULT_SOCKET_NAME))
}
