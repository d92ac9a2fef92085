//! The collection of jobs under observation.

use super::entities::{JobHandle, JobSnapshot, JobStatus};
use crate::core::model::JobId;
use std::collections::BTreeMap;

/// All [`JobHandle`]s the client currently observes, keyed by job id.
///
/// Ordered by id so that re-diffs and rendering are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBoard {
    jobs: BTreeMap<JobId, JobHandle>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `handle`, discarding whatever was recorded for its id.
    ///
    /// Used by external commands (start, cancel) which must replace rather
    /// than merge.
    pub fn replace(&mut self, handle: JobHandle) {
        self.jobs.insert(handle.job_id.clone(), handle);
    }

    /// Apply a poll result to an existing handle.
    ///
    /// Returns `false` (and records nothing) when the job is no longer on the
    /// board, so a late poll cannot resurrect a deleted job.
    pub fn apply_snapshot(&mut self, job_id: &JobId, snapshot: JobSnapshot) -> bool {
        match self.jobs.get_mut(job_id) {
            Some(handle) => {
                handle.apply(snapshot);
                true
            }
            None => false,
        }
    }

    /// Record a job the server reports as in flight (e.g. found in the
    /// catalog after a restart). The status is forced to `downloading` so
    /// polling resumes.
    pub fn resume(&mut self, job_id: JobId, mut snapshot: JobSnapshot) {
        snapshot.status = JobStatus::Downloading;
        match self.jobs.get_mut(&job_id) {
            Some(handle) => handle.apply(snapshot),
            None => {
                self.jobs
                    .insert(job_id.clone(), JobHandle::from_snapshot(job_id, snapshot));
            }
        }
    }

    pub fn remove(&mut self, job_id: &JobId) -> Option<JobHandle> {
        self.jobs.remove(job_id)
    }

    pub fn get(&self, job_id: &JobId) -> Option<&JobHandle> {
        self.jobs.get(job_id)
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.jobs.contains_key(job_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobHandle> {
        self.jobs.values()
    }

    pub fn active_ids(&self) -> impl Iterator<Item = &JobId> {
        self.jobs
            .values()
            .filter(|h| h.status.is_active())
            .map(|h| &h.job_id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
