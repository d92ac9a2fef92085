//! Domain layer for assist-stream
//!
//! This crate contains the core entities, value objects and pure state
//! logic. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Streaming
//!
//! A chat reply arrives as a chunked body of `data:` lines. The
//! [`FrameDecoder`] turns arbitrary byte chunks into ordered text deltas and
//! [`StreamStatus`] describes the lifecycle of one exchange.
//!
//! ## Jobs
//!
//! Long-running model downloads are observed as [`JobHandle`]s on a
//! [`JobBoard`]. Progress never regresses while a job is downloading, and a
//! terminal status (`completed`, `failed`, `cancelled`) is final.

pub mod core;
pub mod job;
pub mod stream;
pub mod transcript;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::{JobId, ModelId},
};
pub use job::{
    board::JobBoard,
    catalog::{CatalogCommon, CatalogEntry, ImageModelEntry, TextModelEntry},
    entities::{JobHandle, JobSnapshot, JobStatus},
};
pub use stream::{
    decoder::{DecodeAnomaly, FrameDecoder},
    status::StreamStatus,
};
pub use transcript::{
    entities::{ContentType, Message, MessageContent, Role},
    log::Transcript,
};
