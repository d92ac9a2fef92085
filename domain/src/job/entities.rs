//! Background job entities (model downloads).

use crate::core::model::JobId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Observed status of a background job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Known but not transferring (server reports `idle`/`unknown`).
    Queued,
    /// Transferring; polled while in this state.
    Downloading,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Downloading => "downloading",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Map a status string reported by the job service.
    ///
    /// `started` is the transient state right after a download is accepted
    /// and is polled exactly like `downloading`.
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "started" | "downloading" => JobStatus::Downloading,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            "cancelled" | "canceled" => JobStatus::Cancelled,
            _ => JobStatus::Queued,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Downloading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JobStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(JobStatus::from_wire(&s))
    }
}

/// One status report for a job, as returned by a poll (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub downloaded: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn new(status: JobStatus, progress: f64) -> Self {
        Self {
            status,
            progress: Some(progress),
            downloaded: 0,
            total: 0,
            error: None,
        }
    }

    pub fn with_bytes(mut self, downloaded: u64, total: u64) -> Self {
        self.downloaded = downloaded;
        self.total = total;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Reported progress clamped to `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        match self.progress {
            Some(p) if p.is_finite() => p.clamp(0.0, 100.0).floor() as u8,
            _ => 0,
        }
    }
}

/// The client's view of one job under observation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobHandle {
    pub job_id: JobId,
    pub status: JobStatus,
    pub progress_percent: u8,
    pub bytes_transferred: u64,
    pub bytes_total: u64,
    pub error: Option<String>,
}

impl JobHandle {
    pub fn new(job_id: JobId, status: JobStatus) -> Self {
        let progress_percent = if status == JobStatus::Completed { 100 } else { 0 };
        Self {
            job_id,
            status,
            progress_percent,
            bytes_transferred: 0,
            bytes_total: 0,
            error: None,
        }
    }

    pub fn downloading(job_id: JobId) -> Self {
        Self::new(job_id, JobStatus::Downloading)
    }

    pub fn from_snapshot(job_id: JobId, snapshot: JobSnapshot) -> Self {
        Self {
            job_id,
            status: snapshot.status,
            progress_percent: snapshot.progress_percent(),
            bytes_transferred: snapshot.downloaded,
            bytes_total: snapshot.total,
            error: snapshot.error,
        }
    }

    /// Replace this handle's state with a poll result.
    ///
    /// While the job stays `downloading`, progress never moves backwards:
    /// a lower reported value keeps the previous one.
    pub fn apply(&mut self, snapshot: JobSnapshot) {
        let incoming = snapshot.progress_percent();
        let progress_percent = if self.status.is_active() && snapshot.status.is_active() {
            self.progress_percent.max(incoming)
        } else {
            incoming
        };
        self.status = snapshot.status;
        self.progress_percent = progress_percent;
        self.bytes_transferred = snapshot.downloaded;
        self.bytes_total = snapshot.total;
        self.error = snapshot.error;
    }

    /// Completed fraction in `0.0..=1.0`, preferring byte counts when known.
    pub fn fraction(&self) -> f64 {
        if self.bytes_total > 0 {
            (self.bytes_transferred as f64 / self.bytes_total as f64).clamp(0.0, 1.0)
        } else {
            f64::from(self.progress_percent) / 100.0
        }
    }
}
