//! Use cases (application services)

pub mod manage_jobs;
pub mod stream_session;
pub mod track_jobs;
