//! Error types for the LacQuer client.

use thiserror::Error;

/// Result type for LacQuer client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// LacQuer client errors.
///
/// Each variant tags a distinct failure class so callers can branch on the
/// kind of failure instead of matching message strings.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration error (bad base URL, missing settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local validation failure caught before any network call
    /// (e.g. a missing bot-verification token)
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP 401 — the session has been invalidated and cleared
    #[error("Authentication required. Your session may have expired.")]
    Unauthorized,

    /// Non-2xx response with the server's error message (or a synthesized
    /// one when the body was not parseable)
    #[error("API error ({status}): {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose envelope reported `success: false`
    #[error("API error: {0}")]
    Api(String),

    /// Network error (DNS, connection refused, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error (invalid JSON, unexpected response shape)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Durable session storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_message_is_stable() {
        // The login UI keys its "session expired" notice off this text.
        assert_eq!(
            ApiError::Unauthorized.to_string(),
            "Authentication required. Your session may have expired."
        );
    }

    #[test]
    fn http_error_carries_status() {
        let err = ApiError::Http {
            status: 404,
            message: "Tag not found".into(),
        };
        assert_eq!(err.to_string(), "API error (404): Tag not found");
    }
}
