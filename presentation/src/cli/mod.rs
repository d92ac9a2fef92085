//! CLI definitions

pub mod commands;
