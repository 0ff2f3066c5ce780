use ethbench_core::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unable to connect to {}: {source}", .endpoint.display())]
    Connect {
        endpoint: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single call never produced a reply. Always counted as a failed call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    #[error("Read failed: {0}")]
    Read(#[source] io::Error),
}
