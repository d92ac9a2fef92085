//! Background job domain (model downloads).
//!
//! - [`entities::JobHandle`]: client-side view of one job
//! - [`board::JobBoard`]: all jobs under observation
//! - [`catalog::CatalogEntry`]: downloadable models, text or image

pub mod board;
pub mod catalog;
pub mod entities;
