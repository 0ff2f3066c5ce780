use crate::data::per_second;
use serde::Serialize;
use serde_with::{serde_as, DurationSecondsWithFrac};
use std::fmt;
use std::time::Duration;

/// What ended a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    DurationElapsed,
    Interrupted,
    WorkExhausted,
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationCause::DurationElapsed => "duration elapsed",
            TerminationCause::Interrupted => "interrupted",
            TerminationCause::WorkExhausted => "work exhausted",
        };
        f.write_str(s)
    }
}

/// Final numbers for a run, across every endpoint.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatistics {
    pub succeeded: u64,
    pub failed: u64,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub elapsed: Duration,
    pub cause: TerminationCause,
    pub concurrency: usize,
    pub endpoints: usize,
}

impl RunStatistics {
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// `succeeded / (succeeded + failed)`, or `0.0` when nothing was sent.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.
        } else {
            self.succeeded as f64 / self.total() as f64
        }
    }

    pub fn total_tps(&self) -> f64 {
        per_second(self.total(), self.elapsed)
    }

    pub fn successful_tps(&self) -> f64 {
        per_second(self.succeeded, self.elapsed)
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let took = Duration::from_millis(self.elapsed.as_millis() as u64);
        write!(
            f,
            "{} succeeded, {} failed, success rate {:.2}; took {}, {:.2} tx/s total, {:.2} tx/s successful",
            self.succeeded,
            self.failed,
            self.success_rate(),
            humantime::format_duration(took),
            self.total_tps(),
            self.successful_tps(),
        )
    }
}
