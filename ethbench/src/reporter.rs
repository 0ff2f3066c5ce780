use crate::state::RunState;
use ethbench_core::SampleData;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, Instrument};

/// Periodically logs how many calls succeeded since the previous period.
///
/// Only reads the run counters. It never stops on its own; abort the task returned by `spawn`
/// or let process exit tear it down.
pub struct ThroughputReporter {
    state: Arc<RunState>,
    interval: Interval,
    last_tick: Instant,
    last_success: u64,
    last_error: u64,
}

impl ThroughputReporter {
    pub async fn new(state: Arc<RunState>, period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // NOTE: First tick completes instantly
        let last_tick = interval.tick().await;
        let last_success = state.succeeded();
        let last_error = state.failed();
        Self {
            state,
            interval,
            last_tick,
            last_success,
            last_error,
        }
    }

    /// Waits for the next tick and returns the counter deltas since the previous one.
    pub async fn sample(&mut self) -> SampleData {
        let next = self.interval.tick().await;
        let elapsed = self.last_tick.elapsed();
        self.last_tick = next;

        let success = self.state.succeeded();
        let error = self.state.failed();
        let sample = SampleData {
            success: success.saturating_sub(self.last_success),
            error: error.saturating_sub(self.last_error),
            elapsed,
        };
        self.last_success = success;
        self.last_error = error;
        sample
    }

    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(
            async move {
                loop {
                    let sample = self.sample().await;
                    info!("{:.2} tx/s", sample.tps());
                    debug!(
                        "{} succeeded, {} failed, error rate {:.2}, {:.2} tx/s total over {}",
                        sample.success,
                        sample.error,
                        sample.error_rate(),
                        sample.total_tps(),
                        humantime::format_duration(sample.elapsed),
                    );

                    #[cfg(feature = "metrics")]
                    metrics::gauge!("ethbench.tps").set(sample.tps());
                }
            }
            .instrument(tracing::info_span!("reporter")),
        )
    }
}
