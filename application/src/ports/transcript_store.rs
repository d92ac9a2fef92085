//! Transcript store port
//!
//! The store owns the conversation turns and the user-visible "streaming"
//! flag. The stream session only appends and rewrites the trailing assistant
//! message; everything else (history loading, rendering) is done by other
//! collaborators that observe the store.

use assist_domain::{DomainError, Message, Transcript};

pub trait TranscriptStore: Send + Sync {
    /// Append a message and return its index.
    fn append(&self, message: Message) -> usize;

    /// Rewrite the content of the trailing assistant message.
    fn set_last_assistant_content(&self, text: &str) -> Result<(), DomainError>;

    /// Replace the whole transcript (e.g. when switching conversations).
    fn replace(&self, messages: Vec<Message>);

    /// Publish whether a reply is currently streaming.
    fn set_streaming(&self, streaming: bool);

    fn is_streaming(&self) -> bool;

    /// Copy of the current transcript.
    fn snapshot(&self) -> Transcript;
}
