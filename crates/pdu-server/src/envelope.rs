//! Response envelope returned for every power-on request

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed three-field response shape
///
/// Built once per request and handed to the transport as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "ErrorCode")]
    error_code: i64,
    #[serde(rename = "Message")]
    message: Option<String>,
    #[serde(rename = "Data")]
    data: Option<Value>,
}

impl ResponseEnvelope {
    /// Successful result carrying the backend payload
    pub fn success(data: Value) -> Self {
        Self {
            error_code: 0,
            message: None,
            data: Some(data),
        }
    }

    /// Failed result; `Data` is always null
    pub fn failure(error_code: i64, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error_code(&self) -> i64 {
        self.error_code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }
}
