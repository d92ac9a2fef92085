//! Job progress notification port
//!
//! [`JobProgressNotifier`] is an output port the presentation layer
//! implements to show download progress. All methods default to no-ops so
//! implementers only override what they display.

use super::job_api::JobApiError;
use assist_domain::{CatalogEntry, JobHandle, JobId};

pub trait JobProgressNotifier: Send + Sync {
    /// Polling started for a job.
    fn on_job_tracked(&self, _handle: &JobHandle) {}

    /// A poll result was applied.
    fn on_job_progress(&self, _handle: &JobHandle) {}

    /// The job reached a terminal status (or left the board) and polling
    /// stopped.
    fn on_job_finished(&self, _job_id: &JobId, _handle: Option<&JobHandle>) {}

    /// Consecutive poll failures for a job reached the stall threshold.
    fn on_poll_stalled(&self, _job_id: &JobId, _consecutive_failures: u32, _error: &JobApiError) {}

    /// A catalog refresh completed.
    fn on_catalog_refreshed(&self, _entries: &[CatalogEntry]) {}
}

/// No-op notifier for when progress reporting is not needed
pub struct NoJobProgress;

impl JobProgressNotifier for NoJobProgress {}
