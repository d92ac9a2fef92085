//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Conversion into application parameters happens here so the binary only
//! wires things together.

mod chat;
mod jobs;
mod logging;
mod server;

pub use chat::FileChatConfig;
pub use jobs::FileJobsConfig;
pub use logging::FileLoggingConfig;
pub use server::FileServerConfig;

use assist_application::SessionParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("server.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("server.request_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("jobs.poll_interval_ms cannot be 0")]
    InvalidPollInterval,

    #[error("chat.default_model cannot be empty")]
    EmptyModelName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backend connection
    pub server: FileServerConfig,
    /// Download tracking
    pub jobs: FileJobsConfig,
    /// Chat defaults
    pub chat: FileChatConfig,
    /// Structured event log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.jobs.poll_interval_ms == 0 {
            return Err(ConfigValidationError::InvalidPollInterval);
        }
        if let Some(model) = &self.chat.default_model
            && model.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyModelName);
        }
        Ok(())
    }

    pub fn session_params(&self) -> SessionParams {
        let params = SessionParams::new(self.server.chat_endpoint())
            .with_failure_notice(self.chat.failure_notice.clone());
        match &self.server.auth_token {
            Some(token) => params.with_auth_token(token.clone()),
            None => params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::{
        Figment,
        providers::{Format, Toml},
    };
    use std::time::Duration;

    fn parse(toml: &str) -> FileConfig {
        Figment::from(Toml::string(toml)).extract().unwrap()
    }

    #[test]
    fn test_deserialize_full_config() {
        let config = parse(
            r#"
[server]
base_url = "https://assist.example/api/v1"
auth_token = "abc"
request_timeout_seconds = 10

[jobs]
poll_interval_ms = 250
stall_threshold = 3

[chat]
default_model = "qwen2.5-3b"
failure_notice = "Something went wrong."

[logging]
conversation_log = "/tmp/assist.jsonl"
"#,
        );

        assert_eq!(config.server.base_url, "https://assist.example/api/v1");
        assert_eq!(config.server.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.jobs.poll_interval_ms, 250);
        assert_eq!(config.chat.default_model.as_deref(), Some("qwen2.5-3b"));
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("/tmp/assist.jsonl")
        );
        assert!(config.validate().is_ok());

        let tracker = config.jobs.to_tracker_params();
        assert_eq!(tracker.poll_interval, Duration::from_millis(250));
        assert_eq!(tracker.stall_threshold, 3);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config = parse(
            r#"
[jobs]
stall_threshold = 9
"#,
        );
        assert_eq!(config.jobs.stall_threshold, 9);
        // Defaults should apply
        assert_eq!(config.jobs.poll_interval_ms, 800);
        assert_eq!(config.server, FileServerConfig::default());
        assert_eq!(config.chat.failure_notice, "Error: Failed to get response.");
    }

    #[test]
    fn test_session_params() {
        let mut config = FileConfig::default();
        config.server.auth_token = Some("tok".to_string());

        let params = config.session_params();
        assert_eq!(params.endpoint, "http://localhost:8080/api/v1/chat/send");
        assert_eq!(params.auth_token.as_deref(), Some("tok"));
        assert_eq!(params.failure_notice, "Error: Failed to get response.");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        config.jobs.poll_interval_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidPollInterval)
        );

        let mut config = FileConfig::default();
        config.server.base_url = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyBaseUrl));

        let mut config = FileConfig::default();
        config.server.request_timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let mut config = FileConfig::default();
        config.chat.default_model = Some(String::new());
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));
    }
}
