//! Run coordinator: one engine per endpoint, one reporter, one final report.
use crate::connection::Connector;
use crate::engine::{DispatchEngine, EngineHandle};
use crate::error::RunError;
use crate::reporter::ThroughputReporter;
use crate::sender::EndpointBinding;
use crate::state::RunState;
use ethbench_core::{RunConfig, RunStatistics, TerminationCause};
use futures_util::future::join_all;
use std::future::{pending, Future};
use std::sync::Arc;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Produces the final report of a run.
///
/// `finalize` consumes the latch, so whichever termination cause reaches it first is the only one
/// that gets reported.
#[derive(Debug)]
pub struct FinalReport {
    state: Arc<RunState>,
    concurrency: usize,
    endpoints: usize,
}

impl FinalReport {
    pub fn new(state: Arc<RunState>, concurrency: usize, endpoints: usize) -> Self {
        Self {
            state,
            concurrency,
            endpoints,
        }
    }

    /// Snapshots and logs the run statistics.
    pub fn finalize(self, cause: TerminationCause) -> RunStatistics {
        let stats = self.state.statistics(cause, self.concurrency, self.endpoints);
        info!("Run complete ({cause}): {stats}");
        stats
    }
}

/// Runs the whole benchmark and returns the final statistics.
///
/// Every endpoint is connected before any sender starts; the first connection failure aborts the
/// run. The run then ends on whichever comes first: `interrupt` resolving, the duration elapsing,
/// or (count mode) every engine draining its work.
#[instrument(
    name = "run",
    skip_all,
    fields(endpoints = config.endpoints.len(), mode = %config.mode)
)]
pub async fn run<K, I>(
    connector: &K,
    config: RunConfig,
    interrupt: I,
) -> Result<RunStatistics, RunError>
where
    K: Connector,
    I: Future<Output = ()>,
{
    config.validate()?;

    let mut connections = Vec::with_capacity(config.endpoints.len());
    for endpoint in &config.endpoints {
        let conn = connector
            .connect(&endpoint.path)
            .await
            .map_err(|source| RunError::Connect {
                endpoint: endpoint.path.clone(),
                source,
            })?;
        connections.push(conn);
    }

    let state = RunState::new();
    let mut engines: Vec<EngineHandle> = config
        .endpoints
        .iter()
        .zip(connections)
        .map(|(endpoint, conn)| {
            let binding = EndpointBinding::new(conn, &endpoint.sender, &config.recipient);
            DispatchEngine::new(
                &endpoint.path.display().to_string(),
                binding,
                config.concurrency,
                config.mode,
                state.clone(),
            )
            .start()
        })
        .collect();

    let report = FinalReport::new(state.clone(), config.concurrency, config.endpoints.len());
    let reporter = ThroughputReporter::new(state.clone(), config.report_interval)
        .await
        .spawn();

    let deadline = async {
        match config.mode.deadline() {
            Some(duration) => tokio::time::sleep_until(state.started_at() + duration).await,
            None => pending().await,
        }
    };

    let drained = async {
        if config.mode.count().is_some() {
            join_all(engines.iter_mut().map(EngineHandle::drained)).await;
        } else {
            pending::<()>().await;
        }
    };

    let cause = tokio::select! {
        biased;

        _ = interrupt => TerminationCause::Interrupted,
        _ = deadline => TerminationCause::DurationElapsed,
        _ = drained => TerminationCause::WorkExhausted,
    };

    let stats = report.finalize(cause);

    reporter.abort();
    for engine in engines {
        engine.terminate();
    }

    Ok(stats)
}
