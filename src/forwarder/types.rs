//! Outcome of a forwarding attempt.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message recorded for every 2xx response.
pub const SUCCESS_MESSAGE: &str = "Successfully sent data to API";

/// Uniform record of what happened to one POST.
///
/// `data` is the parsed JSON body on success, the raw body text on an error
/// status, and null when the request never got a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardResult {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
}

impl ForwardResult {
    /// The request never produced a response.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Classify a received response.
    pub fn from_response(status: u16, body: String) -> Self {
        if (200..300).contains(&status) {
            let data = serde_json::from_str::<Value>(&body)
                .ok()
                .filter(|value| !value.is_null());
            Self {
                success: true,
                message: SUCCESS_MESSAGE.to_string(),
                data,
            }
        } else {
            Self {
                success: false,
                message: format!("API returned error: {}", status),
                data: Some(Value::String(body)),
            }
        }
    }
}
