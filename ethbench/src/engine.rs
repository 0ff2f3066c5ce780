//! Dispatch engine: a pool of senders draining a work queue against one endpoint.
use crate::connection::Connection;
use crate::sender::{EndpointBinding, Sender};
use crate::state::RunState;
use crate::work::WorkSource;
use ethbench_core::{DispatchMode, RunStatistics, TerminationCause};
use std::sync::Arc;
use tokio::task::JoinHandle;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// Pending items per sender in duration mode. Items are cheap, this only bounds memory.
const QUEUE_DEPTH_PER_SENDER: usize = 4;

/// An engine that has not started yet.
///
/// `start` consumes it, so an engine runs at most once.
pub struct DispatchEngine<C> {
    label: String,
    binding: Arc<EndpointBinding<C>>,
    concurrency: usize,
    mode: DispatchMode,
    state: Arc<RunState>,
}

impl<C> DispatchEngine<C>
where
    C: Connection + Sync + 'static,
{
    pub fn new(
        label: &str,
        binding: EndpointBinding<C>,
        concurrency: usize,
        mode: DispatchMode,
        state: Arc<RunState>,
    ) -> Self {
        Self {
            label: label.to_string(),
            binding: Arc::new(binding),
            concurrency,
            mode,
            state,
        }
    }

    /// Launches the senders and, in duration mode, the producer feeding them.
    #[instrument(name = "engine", skip_all, fields(endpoint = %self.label))]
    pub fn start(self) -> EngineHandle {
        let source = match self.mode {
            DispatchMode::Count(count) => WorkSource::preloaded(count),
            DispatchMode::Duration(_) => {
                WorkSource::continuous(self.concurrency * QUEUE_DEPTH_PER_SENDER)
            }
        };

        let workers: Vec<_> = (0..self.concurrency)
            .map(|id| {
                let rx = source.receiver();
                let sender = Sender::new(self.binding.clone(), self.state.clone());
                let state = self.state.clone();

                trace!("Spawning sender {id}.");
                tokio::spawn(
                    async move {
                        while let Ok(item) = rx.recv().await {
                            state.mark_dispatched();
                            trace!(item = item.index(), "Dispatching");
                            sender.send().await;
                        }
                        trace!("Sender {id} out of work.");
                    }
                    .in_current_span(),
                )
            })
            .collect();

        info!(
            "Started {} senders for {} ({})",
            self.concurrency,
            self.binding.sender(),
            self.mode
        );

        EngineHandle {
            label: self.label,
            source,
            workers,
        }
    }

    /// Runs this engine alone and reports its own statistics.
    ///
    /// Count mode returns once every item has been sent and answered. Duration mode returns at
    /// the deadline, measured from the creation of `RunState`.
    pub async fn run(self) -> RunStatistics {
        let state = self.state.clone();
        let concurrency = self.concurrency;
        let mode = self.mode;

        let mut handle = self.start();
        let cause = match mode {
            DispatchMode::Count(_) => {
                handle.drained().await;
                TerminationCause::WorkExhausted
            }
            DispatchMode::Duration(duration) => {
                tokio::time::sleep_until(state.started_at() + duration).await;
                TerminationCause::DurationElapsed
            }
        };
        handle.terminate();

        let stats = state.statistics(cause, concurrency, 1);
        info!("{stats}");
        stats
    }
}

/// A running engine.
pub struct EngineHandle {
    label: String,
    source: WorkSource,
    workers: Vec<JoinHandle<()>>,
}

impl EngineHandle {
    /// Resolves once every sender has exited, which only happens after the queue is exhausted.
    /// In duration mode the queue never runs dry, so this never resolves.
    pub async fn drained(&mut self) {
        for worker in self.workers.drain(..) {
            if let Err(err) = worker.await {
                error!("Sender task for {} failed: {err}", self.label);
            }
        }
        debug!("All senders for {} drained", self.label);
    }

    /// Stops issuing work and lets go of the senders.
    ///
    /// Senders are not joined or cancelled: a call in flight runs to completion and still updates
    /// the counters, then its sender finds the queue closed and exits. Anything a sender holds is
    /// shared through `Arc`s and is not needed to produce the final report.
    pub fn terminate(mut self) {
        self.source.stop();
        debug!(
            "Terminated engine for {}, abandoning {} senders",
            self.label,
            self.workers.len()
        );
    }
}
