//! Application layer for assist-stream
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{SessionParams, TrackerParams};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    job_api::{JobApiError, JobCatalog, JobCommands, JobStatusSource, StartOutcome},
    job_progress::{JobProgressNotifier, NoJobProgress},
    transcript_store::TranscriptStore,
    transport::{ChatRequest, ReadChunk, ResponseReader, TransportAdapter, TransportError},
};
pub use use_cases::manage_jobs::ManageJobsUseCase;
pub use use_cases::stream_session::{
    RequestId, StreamError, StreamOutcome, StreamSession, StreamSessionUseCase,
};
pub use use_cases::track_jobs::{
    JobProgressTracker, ReconcileReport, SharedJobBoard, TrackerError, new_job_board,
    refresh_catalog,
};
