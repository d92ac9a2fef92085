//! Manage Jobs use case
//!
//! Start, cancel and delete downloads. These are the external writers of the
//! shared job board: each command replaces the job's handle outright, and
//! the tracker picks the change up on its next re-diff.

use super::track_jobs::{SharedJobBoard, refresh_catalog};
use crate::ports::job_api::{JobApiError, JobCatalog, JobCommands, StartOutcome};
use assist_domain::{JobHandle, JobId, JobStatus};
use std::sync::Arc;
use tracing::{info, warn};

pub struct ManageJobsUseCase<A: JobCommands + JobCatalog + 'static> {
    api: Arc<A>,
    board: SharedJobBoard,
}

impl<A: JobCommands + JobCatalog + 'static> ManageJobsUseCase<A> {
    pub fn new(api: Arc<A>, board: SharedJobBoard) -> Self {
        Self { api, board }
    }

    /// Ask the server to start a download.
    ///
    /// On failure the job is recorded as `failed` with the server's message
    /// and the error is returned.
    pub async fn start(&self, job_id: &JobId) -> Result<JobHandle, JobApiError> {
        let handle = match self.api.start(job_id).await {
            Ok(StartOutcome::Started) | Ok(StartOutcome::AlreadyDownloading) => {
                info!(job_id = %job_id, "Download started");
                JobHandle::downloading(job_id.clone())
            }
            Ok(StartOutcome::AlreadyInstalled) => {
                info!(job_id = %job_id, "Already installed");
                JobHandle::new(job_id.clone(), JobStatus::Completed)
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Download could not be started");
                let mut failed = JobHandle::new(job_id.clone(), JobStatus::Failed);
                failed.error = Some(e.to_string());
                self.record(failed);
                return Err(e);
            }
        };
        self.record(handle.clone());
        Ok(handle)
    }

    pub async fn cancel(&self, job_id: &JobId) -> Result<JobHandle, JobApiError> {
        self.api.cancel(job_id).await?;
        info!(job_id = %job_id, "Download cancelled");
        let handle = JobHandle::new(job_id.clone(), JobStatus::Cancelled);
        self.record(handle.clone());
        Ok(handle)
    }

    /// Delete an installed model, drop its handle and refresh the catalog.
    ///
    /// A failed refresh is logged but does not fail the deletion.
    pub async fn delete(&self, job_id: &JobId) -> Result<(), JobApiError> {
        self.api.delete(job_id).await?;
        info!(job_id = %job_id, "Model deleted");
        self.board.send_if_modified(|board| board.remove(job_id).is_some());
        if let Err(e) = refresh_catalog(self.api.as_ref(), &self.board).await {
            warn!(error = %e, "Catalog refresh after delete failed");
        }
        Ok(())
    }

    fn record(&self, handle: JobHandle) {
        self.board.send_modify(|board| board.replace(handle));
    }
}
