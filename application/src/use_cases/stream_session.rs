//! Stream Session use case
//!
//! Sends one chat message and streams the reply into the transcript as it
//! arrives. A [`StreamSession`] is an explicit state machine owned by the
//! caller:
//!
//! ```text
//! idle -> sending -> streaming -> done | cancelled | errored
//! ```
//!
//! [`StreamSessionUseCase::submit`] performs the synchronous part (append the
//! user message and an empty assistant placeholder, raise the streaming
//! flag) and [`StreamSession::run`] drives the exchange to a terminal state.
//! Only one session per use case can be live at a time.

use crate::config::SessionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::transcript_store::TranscriptStore;
use crate::ports::transport::{ChatRequest, ResponseReader, TransportAdapter, TransportError};
use assist_domain::{DomainError, FrameDecoder, Message, ModelId, StreamStatus};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Errors that can occur while submitting or streaming a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("A reply is already streaming")]
    ConcurrentSession,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] DomainError),

    #[error("Stream cancelled")]
    Cancelled,
}

impl StreamError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }
}

/// Identifier of one exchange, unique per use case instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    pub request_id: RequestId,
    /// Always terminal.
    pub status: StreamStatus,
    /// Final content of the assistant message.
    pub content: String,
    /// Set when `status` is `errored`.
    pub error: Option<StreamError>,
}

/// Releases the single-live-session gate when dropped.
struct LiveSlot(Arc<AtomicBool>);

impl LiveSlot {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LiveSlot(Arc::clone(flag)))
    }
}

impl Drop for LiveSlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Use case for streaming chat replies into a transcript
pub struct StreamSessionUseCase<T: TransportAdapter + 'static> {
    transport: Arc<T>,
    store: Arc<dyn TranscriptStore>,
    params: SessionParams,
    live: Arc<AtomicBool>,
    next_request_id: AtomicU64,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<T: TransportAdapter + 'static> StreamSessionUseCase<T> {
    pub fn new(transport: Arc<T>, store: Arc<dyn TranscriptStore>, params: SessionParams) -> Self {
        Self {
            transport,
            store,
            params,
            live: Arc::new(AtomicBool::new(false)),
            next_request_id: AtomicU64::new(1),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Whether a session created by this use case has not yet finished.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Start a session: `idle -> sending`.
    ///
    /// Rejected without touching the transcript when `content` is blank or
    /// another session is still live.
    pub fn submit(
        &self,
        content: impl Into<String>,
        model: ModelId,
        cancel: CancellationToken,
    ) -> Result<StreamSession<T>, StreamError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(StreamError::EmptyMessage);
        }
        let slot = LiveSlot::acquire(&self.live).ok_or(StreamError::ConcurrentSession)?;

        let request_id = RequestId(self.next_request_id.fetch_add(1, Ordering::Relaxed));
        self.store.append(Message::user(content.clone()));
        let target_message_index = self.store.append(Message::placeholder());
        self.store.set_streaming(true);

        debug!(%request_id, target_message_index, "Session submitted");

        Ok(StreamSession {
            request_id,
            status: StreamStatus::Idle.transition(StreamStatus::Sending)?,
            target_message_index,
            request: ChatRequest::new(content, model),
            transport: Arc::clone(&self.transport),
            store: Arc::clone(&self.store),
            params: self.params.clone(),
            cancel,
            conversation_logger: Arc::clone(&self.conversation_logger),
            _slot: slot,
        })
    }

    /// Submit and run to completion.
    pub async fn send(
        &self,
        content: impl Into<String>,
        model: ModelId,
        cancel: CancellationToken,
    ) -> Result<StreamOutcome, StreamError> {
        let session = self.submit(content, model, cancel)?;
        Ok(session.run().await)
    }
}

/// One streaming exchange.
pub struct StreamSession<T: TransportAdapter + 'static> {
    request_id: RequestId,
    status: StreamStatus,
    target_message_index: usize,
    request: ChatRequest,
    transport: Arc<T>,
    store: Arc<dyn TranscriptStore>,
    params: SessionParams,
    cancel: CancellationToken,
    conversation_logger: Arc<dyn ConversationLogger>,
    _slot: LiveSlot,
}

impl<T: TransportAdapter + 'static> StreamSession<T> {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    /// Transcript index of the assistant placeholder this session writes.
    pub fn target_message_index(&self) -> usize {
        self.target_message_index
    }

    /// Token that cancels this session.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive the exchange to a terminal state.
    ///
    /// Never fails: every error becomes the `errored` state with the failure
    /// notice written over the reply.
    pub async fn run(mut self) -> StreamOutcome {
        info!(request_id = %self.request_id, model = %self.request.model, "Streaming reply");
        self.conversation_logger.log(ConversationEvent::new(
            "stream_started",
            json!({
                "request_id": self.request_id.value(),
                "model": self.request.model.as_str(),
                "message": self.request.message,
            }),
        ));

        let mut accumulator = String::new();
        let (status, error) = match self.consume(&mut accumulator).await {
            Ok(()) => (StreamStatus::Done, None),
            Err(StreamError::Cancelled) => {
                info!(request_id = %self.request_id, "Stream cancelled");
                (StreamStatus::Cancelled, None)
            }
            Err(e) => {
                warn!(request_id = %self.request_id, error = %e, "Stream failed");
                accumulator = self.params.failure_notice.clone();
                if let Err(store_err) = self.store.set_last_assistant_content(&accumulator) {
                    warn!(error = %store_err, "Could not write failure notice");
                }
                (StreamStatus::Errored, Some(e))
            }
        };

        self.finish(status);
        self.conversation_logger.log(ConversationEvent::new(
            "stream_finished",
            json!({
                "request_id": self.request_id.value(),
                "status": status.as_str(),
                "chars": accumulator.chars().count(),
                "error": error.as_ref().map(|e| e.to_string()),
            }),
        ));

        StreamOutcome {
            request_id: self.request_id,
            status,
            content: accumulator,
            error,
        }
    }

    async fn consume(&mut self, accumulator: &mut String) -> Result<(), StreamError> {
        let opened = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = self.transport.open(
                &self.params.endpoint,
                &self.request,
                self.params.auth_token.as_deref(),
            ) => Some(result),
        };
        let mut reader = opened.ok_or(StreamError::Cancelled)??;

        self.status = self.status.transition(StreamStatus::Streaming)?;
        debug!(request_id = %self.request_id, "Connection established");

        let mut decoder = FrameDecoder::new();
        let result = self.pump(reader.as_mut(), &mut decoder, accumulator).await;
        if result.is_err() {
            reader.abort();
        }
        if !decoder.anomalies().is_empty() {
            trace!(
                request_id = %self.request_id,
                skipped = decoder.anomalies().len(),
                "Ignored non-data lines"
            );
        }
        result
    }

    async fn pump(
        &self,
        reader: &mut dyn ResponseReader,
        decoder: &mut FrameDecoder,
        accumulator: &mut String,
    ) -> Result<(), StreamError> {
        loop {
            let read = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                result = reader.read_next() => Some(result),
            };
            let chunk = read.ok_or(StreamError::Cancelled)??;

            for delta in decoder.feed(&chunk.bytes) {
                self.apply_delta(accumulator, &delta)?;
            }

            if chunk.is_final {
                for delta in decoder.finish() {
                    self.apply_delta(accumulator, &delta)?;
                }
                return Ok(());
            }
        }
    }

    fn apply_delta(&self, accumulator: &mut String, delta: &str) -> Result<(), StreamError> {
        if self.cancel.is_cancelled() {
            return Err(StreamError::Cancelled);
        }
        accumulator.push_str(delta);
        self.store.set_last_assistant_content(accumulator)?;
        Ok(())
    }

    fn finish(&mut self, status: StreamStatus) {
        debug_assert!(self.status.can_transition_to(status));
        self.status = status;
        self.store.set_streaming(false);
    }
}

impl<T: TransportAdapter + 'static> Drop for StreamSession<T> {
    fn drop(&mut self) {
        // Dropped before `run` finished
        if !self.status.is_terminal() {
            self.store.set_streaming(false);
        }
    }
}
