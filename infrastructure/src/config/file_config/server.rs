//! `[server]` section.

use serde::{Deserialize, Serialize};

/// Raw backend connection settings from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// API root, e.g. `http://localhost:8080/api/v1`
    pub base_url: String,
    /// Streaming chat endpoint, relative to `base_url`
    pub chat_path: String,
    /// Bearer token for every request
    pub auth_token: Option<String>,
    /// Timeout for non-streaming requests
    pub request_timeout_seconds: u64,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            chat_path: "chat/send".to_string(),
            auth_token: None,
            request_timeout_seconds: 30,
        }
    }
}

impl FileServerConfig {
    /// Full URL of the streaming chat endpoint.
    pub fn chat_endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_endpoint_joins_slashes() {
        let config = FileServerConfig {
            base_url: "http://host/api/v1/".to_string(),
            chat_path: "/chat/send".to_string(),
            ..FileServerConfig::default()
        };
        assert_eq!(config.chat_endpoint(), "http://host/api/v1/chat/send");
        assert_eq!(
            FileServerConfig::default().chat_endpoint(),
            "http://localhost:8080/api/v1/chat/send"
        );
    }
}
