//! Interactive chat module
//!
//! Provides the line-based chat loop and the console echo of streamed
//! replies.

mod renderer;
mod repl;

pub use renderer::EchoingTranscriptStore;
pub use repl::ChatRepl;
