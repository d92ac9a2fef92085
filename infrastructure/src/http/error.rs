//! Error types for the HTTP adapters

use assist_application::{JobApiError, TransportError};
use thiserror::Error;

/// Errors raised while talking to the assistant backend over HTTP
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Server reported an error: {message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl HttpError {
    /// Map a non-success status and its body.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            HttpError::Unauthorized
        } else {
            HttpError::Status {
                status: status.as_u16(),
                body,
            }
        }
    }
}

impl From<HttpError> for TransportError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) if e.is_timeout() => TransportError::Timeout,
            HttpError::Request(e) => TransportError::Connection(e.to_string()),
            HttpError::Status { status, body } => TransportError::Status {
                status,
                message: body,
            },
            HttpError::Unauthorized => TransportError::Unauthorized,
            HttpError::Rejected { message, .. } => TransportError::Status {
                status: 200,
                message,
            },
            HttpError::Json(e) => TransportError::Connection(e.to_string()),
        }
    }
}

impl From<HttpError> for JobApiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) if e.is_decode() => JobApiError::Decode(e.to_string()),
            HttpError::Request(e) => JobApiError::Connection(e.to_string()),
            HttpError::Status { status, body } => JobApiError::Status {
                status,
                message: body,
            },
            HttpError::Unauthorized => JobApiError::Unauthorized,
            HttpError::Rejected { message, .. } => JobApiError::Rejected(message),
            HttpError::Json(e) => JobApiError::Decode(e.to_string()),
        }
    }
}
