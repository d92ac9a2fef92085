//! Streaming transport port
//!
//! Defines how the application opens a streaming chat exchange and reads
//! the response body incrementally. Implementations (adapters) live in the
//! infrastructure layer.

use assist_domain::ModelId;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by a [`TransportAdapter`] or [`ResponseReader`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request timed out")]
    Timeout,

    #[error("Stream interrupted: {0}")]
    Interrupted(String),
}

/// Body of a chat request: `{"message": ..., "model": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub model: ModelId,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, model: ModelId) -> Self {
        Self {
            message: message.into(),
            model,
        }
    }
}

/// One read from the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadChunk {
    pub bytes: Vec<u8>,
    /// No more data will follow this read.
    pub is_final: bool,
}

impl ReadChunk {
    pub fn data(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            is_final: false,
        }
    }

    pub fn end() -> Self {
        Self {
            bytes: Vec::new(),
            is_final: true,
        }
    }
}

/// Opens outbound streaming exchanges.
#[async_trait]
pub trait TransportAdapter: Send + Sync {
    /// Begin an exchange.
    ///
    /// Fails with [`TransportError`] on connection failure or a non-success
    /// status before any body data is read.
    async fn open(
        &self,
        endpoint: &str,
        payload: &ChatRequest,
        auth_token: Option<&str>,
    ) -> Result<Box<dyn ResponseReader>, TransportError>;
}

/// Incremental reader over one response body.
#[async_trait]
pub trait ResponseReader: Send {
    /// Wait for the next chunk or the end of the body.
    ///
    /// After [`abort`](Self::abort) this resolves immediately with
    /// [`ReadChunk::end`].
    async fn read_next(&mut self) -> Result<ReadChunk, TransportError>;

    /// Stop delivery. Idempotent.
    fn abort(&mut self);
}
