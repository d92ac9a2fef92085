//! Transcript store adapters.

mod memory;

pub use memory::InMemoryTranscriptStore;
