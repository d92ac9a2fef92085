//! HTTP adapters for the assistant backend.

mod envelope;
pub mod error;
mod job_api;
mod stream_transport;

pub use error::HttpError;
pub use job_api::HttpJobApi;
pub use stream_transport::{HttpResponseReader, HttpStreamTransport};
