//! Streaming response domain.
//!
//! - [`decoder::FrameDecoder`]: turns raw body chunks into text deltas
//! - [`status::StreamStatus`]: lifecycle of one streaming exchange

pub mod decoder;
pub mod status;
