//! API response envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,

    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,

    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error payload carried inside the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code for programmatic handling
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Attempts left on the current code, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<i32>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    /// Create an error response
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                message: message.into(),
                remaining_attempts: None,
            }),
            timestamp: Utc::now(),
            request_id: None,
        }
    }

    /// Attach the attempts-left counter to an error response
    pub fn with_remaining_attempts(mut self, remaining: i32) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.remaining_attempts = Some(remaining);
        }
        self
    }

    /// Add request ID for tracing
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_has_no_error() {
        let resp = ApiResponse::success(42);
        assert!(resp.success);
        assert_eq!(resp.data, Some(42));
        assert!(resp.error.is_none());
    }

    #[test]
    fn error_envelope_carries_code_and_attempts() {
        let resp = ApiResponse::<()>::error("INVALID_CODE", "Incorrect code")
            .with_remaining_attempts(2);
        let error = resp.error.expect("error body");
        assert_eq!(error.code, "INVALID_CODE");
        assert_eq!(error.remaining_attempts, Some(2));
    }

    #[test]
    fn envelope_serializes_without_null_fields() {
        let resp = ApiResponse::success("ok");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"request_id\""));
    }
}
