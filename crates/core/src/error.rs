//! Error taxonomy for GitHub-backed operations.
//!
//! Every failure that crosses an adapter boundary is one [`GitHubError`]
//! variant, and every variant maps to exactly one [`ErrorKind`]. The wire
//! form handed to callers is the [`ErrorEnvelope`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result type for GitHub-backed operations.
pub type GitHubResult<T> = Result<T, GitHubError>;

/// The fixed set of error kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing input (HTTP 400 semantics).
    ValidationError,
    /// Invalid or missing credential (401).
    AuthenticationError,
    /// Authorized but forbidden (403, not rate limited).
    PermissionError,
    /// Rate limited (403 with a rate-limit signal).
    RateLimitError,
    /// Resource does not exist (404).
    ResourceNotFoundError,
    /// Resource conflict (409).
    ConflictError,
    /// Any other failure reported by the backend.
    GitHubError,
    /// A local fault that was not classified by the backend.
    ServerError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::AuthenticationError => "AuthenticationError",
            Self::PermissionError => "PermissionError",
            Self::RateLimitError => "RateLimitError",
            Self::ResourceNotFoundError => "ResourceNotFoundError",
            Self::ConflictError => "ConflictError",
            Self::GitHubError => "GitHubError",
            Self::ServerError => "ServerError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GitHubError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("{message}")]
    Authentication {
        message: String,
        details: Option<Value>,
    },

    #[error("{message}")]
    Permission {
        message: String,
        details: Option<Value>,
    },

    #[error("{message}")]
    RateLimit {
        message: String,
        reset_at: DateTime<Utc>,
        details: Option<Value>,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<Value>,
    },

    #[error("{message}")]
    Conflict {
        message: String,
        details: Option<Value>,
    },

    #[error("{message} (Status code: {status})")]
    Api {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    #[error("{0}")]
    Server(String),
}

impl GitHubError {
    /// Create a validation error without backend details.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Create a local fault.
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Authentication { .. } => ErrorKind::AuthenticationError,
            Self::Permission { .. } => ErrorKind::PermissionError,
            Self::RateLimit { .. } => ErrorKind::RateLimitError,
            Self::NotFound { .. } => ErrorKind::ResourceNotFoundError,
            Self::Conflict { .. } => ErrorKind::ConflictError,
            Self::Api { .. } => ErrorKind::GitHubError,
            Self::Server(_) => ErrorKind::ServerError,
        }
    }

    /// Raw backend response body, when the backend supplied one.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Validation { details, .. }
            | Self::Authentication { details, .. }
            | Self::Permission { details, .. }
            | Self::RateLimit { details, .. }
            | Self::NotFound { details, .. }
            | Self::Conflict { details, .. }
            | Self::Api { details, .. } => details.as_ref(),
            Self::Server(_) => None,
        }
    }

    /// Reset time for rate-limit errors.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::RateLimit { reset_at, .. } => Some(*reset_at),
            _ => None,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::from(self)
    }
}

/// Rate-limit metadata read from backend response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// `X-RateLimit-Remaining`
    pub remaining: Option<u64>,
    /// `X-RateLimit-Reset`, in epoch seconds
    pub reset: Option<i64>,
}

impl RateLimitHeaders {
    /// Parse the raw header values; unparseable values count as absent.
    pub fn from_header_values(remaining: Option<&str>, reset: Option<&str>) -> Self {
        Self {
            remaining: remaining.and_then(|v| v.trim().parse().ok()),
            reset: reset.and_then(|v| v.trim().parse().ok()),
        }
    }

    /// The quota is known to be used up.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Reset time, or the Unix epoch when the backend did not send one.
    pub fn reset_at(&self) -> DateTime<Utc> {
        self.reset
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_default()
    }
}

/// Map a failed backend response into the error taxonomy.
///
/// `default_message` is used whenever the body is missing, is not JSON, or
/// carries no string `message` field.
pub fn classify(
    status: u16,
    body: Option<Value>,
    rate_limit: RateLimitHeaders,
    default_message: &str,
) -> GitHubError {
    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default_message.to_string());
    let details = body.filter(|b| !is_empty_json(b));

    match status {
        400 => GitHubError::Validation { message, details },
        401 => GitHubError::Authentication { message, details },
        403 if rate_limit.is_exhausted() || message.to_lowercase().contains("rate limit") => {
            GitHubError::RateLimit {
                message,
                reset_at: rate_limit.reset_at(),
                details,
            }
        }
        403 => GitHubError::Permission { message, details },
        404 => GitHubError::NotFound { message, details },
        409 => GitHubError::Conflict { message, details },
        _ => GitHubError::Api {
            status,
            message,
            details,
        },
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Structured failure body returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<DateTime<Utc>>,
}

impl From<&GitHubError> for ErrorEnvelope {
    fn from(err: &GitHubError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
            details: err.details().cloned(),
            reset_at: err.reset_at(),
        }
    }
}

impl From<GitHubError> for ErrorEnvelope {
    fn from(err: GitHubError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(message: &str) -> Option<Value> {
        Some(json!({ "message": message }))
    }

    #[test]
    fn test_status_codes_map_to_kinds() {
        let cases = [
            (400, ErrorKind::ValidationError),
            (401, ErrorKind::AuthenticationError),
            (403, ErrorKind::PermissionError),
            (404, ErrorKind::ResourceNotFoundError),
            (409, ErrorKind::ConflictError),
            (422, ErrorKind::GitHubError),
            (500, ErrorKind::GitHubError),
        ];

        for (status, kind) in cases {
            let err = classify(status, body("nope"), RateLimitHeaders::default(), "default");
            assert_eq!(err.kind(), kind, "status {}", status);
        }
    }

    #[test]
    fn test_rate_limit_detected_from_message() {
        let headers = RateLimitHeaders::from_header_values(None, Some("1700000000"));
        let err = classify(403, body("API Rate Limit exceeded for user"), headers, "default");

        assert_eq!(err.kind(), ErrorKind::RateLimitError);
        assert_eq!(err.reset_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_rate_limit_reset_defaults_to_epoch() {
        let err = classify(403, body("rate limit exceeded"), RateLimitHeaders::default(), "x");

        assert_eq!(err.reset_at().unwrap().timestamp(), 0);
    }

    #[test]
    fn test_rate_limit_detected_from_remaining_header() {
        let headers = RateLimitHeaders::from_header_values(Some("0"), Some("42"));
        let err = classify(403, body("Forbidden"), headers, "x");

        assert_eq!(err.kind(), ErrorKind::RateLimitError);
        assert_eq!(err.reset_at().unwrap().timestamp(), 42);
    }

    #[test]
    fn test_permission_when_quota_remaining() {
        let headers = RateLimitHeaders::from_header_values(Some("4999"), None);
        let err = classify(403, body("Resource not accessible"), headers, "x");

        assert_eq!(err.kind(), ErrorKind::PermissionError);
        assert!(err.reset_at().is_none());
    }

    #[test]
    fn test_missing_body_uses_default_message() {
        let err = classify(404, None, RateLimitHeaders::default(), "Failed to get repository a/b");

        assert_eq!(err.to_string(), "Failed to get repository a/b");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_generic_error_embeds_status() {
        let err = classify(502, body("Bad gateway"), RateLimitHeaders::default(), "x");

        assert_eq!(err.to_string(), "Bad gateway (Status code: 502)");
    }

    #[test]
    fn test_envelope_carries_details() {
        let raw = json!({ "message": "Validation Failed", "errors": [{ "code": "missing" }] });
        let err = classify(400, Some(raw.clone()), RateLimitHeaders::default(), "x");
        let envelope = err.envelope();

        assert_eq!(envelope.error, ErrorKind::ValidationError);
        assert_eq!(envelope.message, "Validation Failed");
        assert_eq!(envelope.details, Some(raw));

        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(wire["error"], "ValidationError");
        assert!(wire.get("reset_at").is_none());
    }

    #[test]
    fn test_empty_body_is_not_details() {
        let err = classify(409, Some(json!({})), RateLimitHeaders::default(), "conflict");

        assert_eq!(err.to_string(), "conflict");
        assert!(err.details().is_none());
    }
}
