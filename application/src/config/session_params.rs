//! Stream session parameters.

use serde::{Deserialize, Serialize};

/// Notice written over the assistant placeholder when a stream errors.
pub const DEFAULT_FAILURE_NOTICE: &str = "Error: Failed to get response.";

/// Static parameters for every [`StreamSession`](crate::use_cases::stream_session::StreamSession)
/// created by one use case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Full URL of the streaming chat endpoint.
    pub endpoint: String,
    /// Bearer token sent with each request.
    pub auth_token: Option<String>,
    /// User-visible text replacing the reply when the exchange fails.
    pub failure_notice: String,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/v1/chat/send".to_string(),
            auth_token: None,
            failure_notice: DEFAULT_FAILURE_NOTICE.to_string(),
        }
    }
}

impl SessionParams {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_failure_notice(mut self, notice: impl Into<String>) -> Self {
        self.failure_notice = notice.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_failure_notice() {
        let params = SessionParams::default();
        assert_eq!(params.failure_notice, "Error: Failed to get response.");
        assert!(params.auth_token.is_none());
    }

    #[test]
    fn test_builder() {
        let params = SessionParams::new("http://host/chat")
            .with_auth_token("t0k")
            .with_failure_notice("oops");
        assert_eq!(params.endpoint, "http://host/chat");
        assert_eq!(params.auth_token.as_deref(), Some("t0k"));
        assert_eq!(params.failure_notice, "oops");
    }
}
