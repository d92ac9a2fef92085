//! Job service ports
//!
//! The remote job service is split along the three ways the client uses it:
//! polling one job ([`JobStatusSource`]), listing the catalog
//! ([`JobCatalog`]) and issuing commands ([`JobCommands`]).

use assist_domain::{CatalogEntry, JobId, JobSnapshot};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the job service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobApiError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Rejected by server: {0}")]
    Rejected(String),
}

/// Server answer to a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyDownloading,
    AlreadyInstalled,
}

#[async_trait]
pub trait JobStatusSource: Send + Sync {
    /// Fetch the current status of one job.
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot, JobApiError>;
}

#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// Fetch all catalog entries with their installed/download state.
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, JobApiError>;
}

#[async_trait]
pub trait JobCommands: Send + Sync {
    async fn start(&self, job_id: &JobId) -> Result<StartOutcome, JobApiError>;

    async fn cancel(&self, job_id: &JobId) -> Result<(), JobApiError>;

    async fn delete(&self, job_id: &JobId) -> Result<(), JobApiError>;
}
