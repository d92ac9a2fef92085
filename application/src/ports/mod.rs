//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod job_api;
pub mod job_progress;
pub mod transcript_store;
pub mod transport;
