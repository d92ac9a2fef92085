//! Infrastructure layer for assist-stream
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod config;
pub mod http;
pub mod logging;
pub mod transcript;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChatConfig, FileConfig, FileJobsConfig,
    FileLoggingConfig, FileServerConfig,
};
pub use http::{HttpError, HttpJobApi, HttpResponseReader, HttpStreamTransport};
pub use logging::JsonlConversationLogger;
pub use transcript::InMemoryTranscriptStore;
