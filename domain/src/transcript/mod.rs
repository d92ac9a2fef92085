//! Conversation transcript domain.
//!
//! - [`entities::Message`]: a single turn (text or image reference)
//! - [`log::Transcript`]: the ordered log and its mutation rule

pub mod entities;
pub mod log;
