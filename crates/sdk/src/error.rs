//! Error types for the hubgate SDK.

use hubgate_core::{ErrorEnvelope, ErrorKind};

/// Result type for SDK operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error types that can occur when talking to a gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Present when the body was a gateway error envelope.
        envelope: Option<ErrorEnvelope>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tool result did not carry the expected content.
    #[error("Unexpected tool result: {0}")]
    UnexpectedResult(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GatewayError {
    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Api {
                status,
                message: envelope.message.clone(),
                envelope: Some(envelope),
            },
            Err(_) => Self::Api {
                status,
                message: body.to_string(),
                envelope: None,
            },
        }
    }

    /// Error category reported by the gateway, if any.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Api {
                envelope: Some(envelope),
                ..
            } => Some(envelope.error),
            _ => None,
        }
    }

    /// True when the gateway rejected the request itself rather than
    /// failing against GitHub.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::Api { status: 400, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_parses_envelope() {
        let body = r#"{"error":"RateLimitError","message":"API rate limit exceeded","reset_at":"2023-11-14T22:13:20Z"}"#;
        let err = GatewayError::from_response(500, body);

        assert_eq!(err.kind(), Some(ErrorKind::RateLimitError));
        assert!(!err.is_bad_request());
        match err {
            GatewayError::Api {
                status,
                message,
                envelope: Some(envelope),
            } => {
                assert_eq!(status, 500);
                assert_eq!(message, "API rate limit exceeded");
                assert!(envelope.reset_at.is_some());
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_response_keeps_plain_body() {
        let err = GatewayError::from_response(502, "Bad Gateway");

        assert_eq!(err.kind(), None);
        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
    }
}
