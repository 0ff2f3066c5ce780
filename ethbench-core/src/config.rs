use crate::{ConfigError, DEFAULT_CONCURRENCY, DEFAULT_NUMBER, DEFAULT_REPORT_INTERVAL};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// How a dispatch engine decides it is done. Chosen once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchMode {
    /// Send exactly this many calls per endpoint, then stop.
    Count(u64),
    /// Keep sending until the duration elapses (or the run is interrupted).
    Duration(Duration),
}

impl DispatchMode {
    pub fn deadline(&self) -> Option<Duration> {
        match self {
            DispatchMode::Duration(duration) => Some(*duration),
            DispatchMode::Count(_) => None,
        }
    }

    pub fn count(&self) -> Option<u64> {
        match self {
            DispatchMode::Count(count) => Some(*count),
            DispatchMode::Duration(_) => None,
        }
    }
}

impl Default for DispatchMode {
    fn default() -> Self {
        DispatchMode::Count(DEFAULT_NUMBER)
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Count(count) => write!(f, "{count} calls"),
            DispatchMode::Duration(duration) => {
                write!(f, "{}", humantime::format_duration(*duration))
            }
        }
    }
}

/// One socket and the account that sends from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
    pub path: PathBuf,
    pub sender: String,
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub endpoints: Vec<EndpointConfig>,
    pub recipient: String,
    pub concurrency: usize,
    pub mode: DispatchMode,
    pub report_interval: Duration,
}

impl RunConfig {
    /// Pair every socket path with the sender identity at the same position.
    ///
    /// Fails if the two lists differ in length or are empty. Identities are not inspected; the
    /// node is the only judge of whether they are valid.
    pub fn new(
        paths: Vec<PathBuf>,
        senders: Vec<String>,
        recipient: &str,
    ) -> Result<Self, ConfigError> {
        if paths.len() != senders.len() {
            return Err(ConfigError::EndpointMismatch {
                endpoints: paths.len(),
                senders: senders.len(),
            });
        }

        if paths.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        let endpoints = paths
            .into_iter()
            .zip(senders)
            .map(|(path, sender)| EndpointConfig { path, sender })
            .collect();

        Ok(Self {
            endpoints,
            recipient: recipient.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            mode: DispatchMode::default(),
            report_interval: DEFAULT_REPORT_INTERVAL,
        })
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Checks the knobs the builder methods cannot reject on their own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.report_interval.is_zero() {
            return Err(ConfigError::ZeroReportInterval);
        }
        Ok(())
    }
}
