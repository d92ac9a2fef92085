//! Configuration file loading for assist-stream
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `ASSIST_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./assist.toml` or `./.assist.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/assist-stream/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileChatConfig, FileConfig, FileJobsConfig, FileLoggingConfig,
    FileServerConfig,
};
pub use loader::ConfigLoader;
