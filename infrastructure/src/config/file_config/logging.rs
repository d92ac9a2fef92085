//! `[logging]` section.

use serde::{Deserialize, Serialize};

/// Raw logging settings from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving stream and job events. Disabled when unset.
    pub conversation_log: Option<String>,
}
