//! Response envelope handling.
//!
//! The backend wraps most JSON answers as
//! `{"status": "success" | "error", "data": ..., "message": ..., "errorCode": ...}`.
//! Some endpoints (and the runtime behind them) answer with the bare payload
//! instead, so unwrapping is lenient: only a `status` of `success` or
//! `error` is treated as an envelope.

use super::error::HttpError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Strip the envelope, returning the payload or the server's error.
pub fn unwrap_envelope(value: Value) -> Result<Value, HttpError> {
    let Value::Object(mut map) = value else {
        return Ok(value);
    };

    match map.get("status").and_then(Value::as_str) {
        Some("success") => match map.remove("data") {
            Some(data) if !data.is_null() => Ok(data),
            _ => Ok(Value::Object(map)),
        },
        Some("error") => Err(HttpError::Rejected {
            message: map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
            code: map
                .get("errorCode")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        _ => Ok(Value::Object(map)),
    }
}

/// Unwrap and deserialize in one step.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, HttpError> {
    Ok(serde_json::from_value(unwrap_envelope(value)?)?)
}
