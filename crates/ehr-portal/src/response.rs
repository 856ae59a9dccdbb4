//! Uniform outcome of every backend call
//!
//! Whatever happened on the wire (success, backend error, transport
//! failure, unreadable body), callers always get an `ApiResponse`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a failure carries no text of its own
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Failed outcome; an empty message is replaced with a generic one
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            NETWORK_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        ApiResponse {
            success: false,
            data: None,
            message: Some(message),
        }
    }

    /// Failure message, or `fallback` if the failure had none
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }

    /// Successful data, or the failure message (`fallback` if absent).
    ///
    /// A success without data counts as a failure, matching how pages
    /// only accept `success && data`.
    pub fn into_result(self, fallback: &str) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(self.message.unwrap_or_else(|| fallback.to_string())),
        }
    }
}

/// Normalize a 2xx body into a response.
///
/// An envelope object carrying a boolean `success` is honored: `false`
/// becomes a failure, `true` unwraps `data`. Anything else is the data.
/// An empty body decodes as JSON `null`.
pub fn from_success_body<T: DeserializeOwned>(body: &[u8]) -> ApiResponse<T> {
    let value = match parse_body(body) {
        Ok(value) => value,
        Err(e) => return ApiResponse::failure(format!("invalid response body: {}", e)),
    };

    let payload = match envelope_success(&value) {
        Some(false) => {
            return ApiResponse::failure(
                body_message(&value).unwrap_or_else(|| "Request failed".to_string()),
            )
        }
        Some(true) => value.get("data").cloned().unwrap_or(Value::Null),
        None => value,
    };

    match serde_json::from_value(payload) {
        Ok(data) => ApiResponse::ok(data),
        Err(e) => ApiResponse::failure(format!("invalid response body: {}", e)),
    }
}

/// Normalize a non-2xx response.
///
/// The body's `message` (or `error`) wins; otherwise `Error: <status> <reason>`.
pub fn from_error_body<T>(status: u16, reason: Option<&str>, body: &[u8]) -> ApiResponse<T> {
    let from_body = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| body_message(&value));

    match from_body {
        Some(message) => ApiResponse::failure(message),
        None => {
            let status_line = format!("Error: {} {}", status, reason.unwrap_or(""));
            ApiResponse::failure(status_line.trim_end())
        }
    }
}

fn parse_body(body: &[u8]) -> serde_json::Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

fn envelope_success(value: &Value) -> Option<bool> {
    value.as_object()?.get("success")?.as_bool()
}

fn body_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| object.get(*key)?.as_str())
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}
