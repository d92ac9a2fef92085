//! In-memory transcript store.

use assist_application::TranscriptStore;
use assist_domain::{DomainError, Message, Transcript};
use std::sync::Mutex;
use tokio::sync::watch;

/// [`TranscriptStore`] holding one conversation in memory.
///
/// Every mutation bumps a revision counter published on a watch channel,
/// so renderers can wait for changes instead of polling.
pub struct InMemoryTranscriptStore {
    transcript: Mutex<Transcript>,
    streaming: watch::Sender<bool>,
    revision: watch::Sender<u64>,
}

impl Default for InMemoryTranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::with_transcript(Transcript::new())
    }

    pub fn with_transcript(transcript: Transcript) -> Self {
        let (streaming, _) = watch::channel(false);
        let (revision, _) = watch::channel(0);
        Self {
            transcript: Mutex::new(transcript),
            streaming,
            revision,
        }
    }

    /// Receiver notified whenever the streaming flag changes.
    pub fn subscribe_streaming(&self) -> watch::Receiver<bool> {
        self.streaming.subscribe()
    }

    /// Receiver notified on every transcript mutation.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn with_transcript_mut<R>(&self, f: impl FnOnce(&mut Transcript) -> R) -> R {
        let result = {
            let mut guard = match self.transcript.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            f(&mut guard)
        };
        self.revision.send_modify(|rev| *rev += 1);
        result
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    fn append(&self, message: Message) -> usize {
        self.with_transcript_mut(|t| t.push(message))
    }

    fn set_last_assistant_content(&self, text: &str) -> Result<(), DomainError> {
        self.with_transcript_mut(|t| t.set_last_assistant_content(text))
    }

    fn replace(&self, messages: Vec<Message>) {
        self.with_transcript_mut(|t| t.replace(messages));
    }

    fn set_streaming(&self, streaming: bool) {
        self.streaming.send_if_modified(|current| {
            let changed = *current != streaming;
            *current = streaming;
            changed
        });
    }

    fn is_streaming(&self) -> bool {
        *self.streaming.borrow()
    }

    fn snapshot(&self) -> Transcript {
        match self.transcript.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
