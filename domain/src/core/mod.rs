//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelId`] / [`model::JobId`]: identifiers used on the wire
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
