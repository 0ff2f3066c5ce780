use std::time::Duration;

/// Counter deltas observed over one reporting period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleData {
    pub success: u64,
    pub error: u64,
    pub elapsed: Duration,
}

impl SampleData {
    /// Successful calls per second over the period.
    pub fn tps(&self) -> f64 {
        per_second(self.success, self.elapsed)
    }

    pub fn total_tps(&self) -> f64 {
        per_second(self.total(), self.elapsed)
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.
        } else {
            self.error as f64 / self.total() as f64
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.error
    }
}

pub(crate) fn per_second(count: u64, elapsed: Duration) -> f64 {
    if elapsed.is_zero() {
        0.
    } else {
        count as f64 / elapsed.as_nanos() as f64 * 1e9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tps_counts_successes_only() {
        let sample = SampleData {
            success: 8,
            error: 2,
            elapsed: Duration::from_millis(500),
        };
        assert_eq!(sample.tps(), 16.);
        assert_eq!(sample.total_tps(), 20.);
        assert_eq!(sample.error_rate(), 0.2);
    }

    #[test]
    fn empty_sample_is_zero() {
        let sample = SampleData {
            success: 0,
            error: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(sample.tps(), 0.);
        assert_eq!(sample.error_rate(), 0.);
    }
}
