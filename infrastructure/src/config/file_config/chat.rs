//! `[chat]` section.

use assist_application::config::session_params::DEFAULT_FAILURE_NOTICE;
use serde::{Deserialize, Serialize};

/// Raw chat settings from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Model used when `chat` is run without `--model`
    pub default_model: Option<String>,
    /// Text shown in place of a reply that failed
    pub failure_notice: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            default_model: None,
            failure_notice: DEFAULT_FAILURE_NOTICE.to_string(),
        }
    }
}
