//! API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unified error response body for API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code for programmatic handling
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("NOT_FOUND", "User not found");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"error\":\"NOT_FOUND\""));
        assert!(json.contains("\"message\":\"User not found\""));
        assert!(json.contains("timestamp"));
    }
}
