//! `[jobs]` section.

use assist_application::TrackerParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw job tracking settings from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJobsConfig {
    /// Delay between two status polls of one job
    pub poll_interval_ms: u64,
    /// Consecutive poll failures before a job is reported as stalled
    pub stall_threshold: u32,
}

impl Default for FileJobsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 800,
            stall_threshold: 5,
        }
    }
}

impl FileJobsConfig {
    pub fn to_tracker_params(&self) -> TrackerParams {
        TrackerParams::default()
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_stall_threshold(self.stall_threshold)
    }
}
