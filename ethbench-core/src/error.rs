use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{endpoints} socket(s) configured for {senders} sender address(es); they must be paired one to one")]
    EndpointMismatch { endpoints: usize, senders: usize },

    #[error("No IPC socket configured")]
    NoEndpoints,

    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Report interval must be non-zero")]
    ZeroReportInterval,

    #[error("Unable to resolve the home directory for the default IPC socket path; pass --socket")]
    NoHomeDir,
}
