//! Job tracker parameters.

use std::time::Duration;

/// Poll cadence and failure reporting for
/// [`JobProgressTracker`](crate::use_cases::track_jobs::JobProgressTracker).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerParams {
    /// Fixed delay between two polls of the same job.
    pub poll_interval: Duration,
    /// Consecutive poll failures after which a job is reported as stalled.
    pub stall_threshold: u32,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(800),
            stall_threshold: 5,
        }
    }
}

impl TrackerParams {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_stall_threshold(mut self, threshold: u32) -> Self {
        self.stall_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TrackerParams::default();
        assert_eq!(params.poll_interval, Duration::from_millis(800));
        assert_eq!(params.stall_threshold, 5);
    }
}
