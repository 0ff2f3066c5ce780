use ethbench_core::{RunStatistics, TerminationCause};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Counters and clock shared by every engine, sender and the reporter of one run.
///
/// Counters only ever go up. Readers may observe slightly stale values, which is fine for
/// reporting purposes.
#[derive(Debug)]
pub struct RunState {
    succeeded: AtomicU64,
    failed: AtomicU64,
    dispatched: AtomicU64,
    started_at: Instant,
}

impl RunState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            started_at: Instant::now(),
        })
    }

    pub fn record(&self, success: bool) {
        if success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "metrics")]
            metrics::counter!("ethbench.success").increment(1);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "metrics")]
            metrics::counter!("ethbench.error").increment(1);
        }
    }

    /// Called when a sender takes a work item off the queue.
    pub fn mark_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn statistics(
        &self,
        cause: TerminationCause,
        concurrency: usize,
        endpoints: usize,
    ) -> RunStatistics {
        RunStatistics {
            succeeded: self.succeeded(),
            failed: self.failed(),
            elapsed: self.elapsed(),
            cause,
            concurrency,
            endpoints,
        }
    }
}
