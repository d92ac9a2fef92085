//! Console rendering of a streaming reply.

use assist_application::TranscriptStore;
use assist_domain::{DomainError, Message, Role, Transcript};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

struct EchoState {
    printed: String,
    out: Box<dyn Write + Send>,
}

/// [`TranscriptStore`] decorator that echoes the growing assistant reply to
/// a writer as it is rewritten.
///
/// Only the new suffix is written on each update. When the content is
/// replaced by something that does not extend what was already shown (the
/// failure notice), it is written on a fresh line.
pub struct EchoingTranscriptStore {
    inner: Arc<dyn TranscriptStore>,
    state: Mutex<EchoState>,
}

impl EchoingTranscriptStore {
    pub fn stdout(inner: Arc<dyn TranscriptStore>) -> Self {
        Self::with_writer(inner, Box::new(io::stdout()))
    }

    pub fn with_writer(inner: Arc<dyn TranscriptStore>, out: Box<dyn Write + Send>) -> Self {
        Self {
            inner,
            state: Mutex::new(EchoState {
                printed: String::new(),
                out,
            }),
        }
    }

    fn echo(&self, text: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let state = &mut *state;
        let _ = match text.strip_prefix(state.printed.as_str()) {
            Some(suffix) => write!(state.out, "{suffix}"),
            None => write!(state.out, "\n{text}"),
        };
        let _ = state.out.flush();
        state.printed.clear();
        state.printed.push_str(text);
    }
}

impl TranscriptStore for EchoingTranscriptStore {
    fn append(&self, message: Message) -> usize {
        if message.role == Role::Assistant
            && let Ok(mut state) = self.state.lock()
        {
            state.printed.clear();
        }
        self.inner.append(message)
    }

    fn set_last_assistant_content(&self, text: &str) -> Result<(), DomainError> {
        self.inner.set_last_assistant_content(text)?;
        self.echo(text);
        Ok(())
    }

    fn replace(&self, messages: Vec<Message>) {
        self.inner.replace(messages);
    }

    fn set_streaming(&self, streaming: bool) {
        self.inner.set_streaming(streaming);
        if !streaming
            && let Ok(mut state) = self.state.lock()
            && !state.printed.is_empty()
        {
            let _ = writeln!(state.out);
            let _ = state.out.flush();
            state.printed.clear();
        }
    }

    fn is_streaming(&self) -> bool {
        self.inner.is_streaming()
    }

    fn snapshot(&self) -> Transcript {
        self.inner.snapshot()
    }
}
