//! Error types for Content API operations.

use thiserror::Error;

/// Errors that can occur during Content API operations.
#[derive(Debug, Error)]
pub enum ContentApiError {
    /// A required argument was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration is missing or incomplete.
    #[error("Content API configuration required: {0}")]
    ConfigMissing(String),

    /// The API answered with an unexpected status, an unusable body,
    /// or could not be reached at all.
    #[error("Content API client error: {message}")]
    Client {
        message: String,
        status_code: Option<u16>,
    },

    /// The authenticator could not obtain a token.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Credentials were refused and no further attempts will be made.
    #[error("Access denied: {message}")]
    AccessDenied {
        message: String,
        #[source]
        source: Option<Box<ContentApiError>>,
    },

    /// Response body is not (valid) JSON.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Composite associations nested deeper than the resolver allows.
    #[error("Association nesting exceeded the maximum depth of {depth}")]
    ResolutionDepthExceeded { depth: usize },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ContentApiError {
    /// HTTP status attached to a client error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Client { status_code, .. } => *status_code,
            _ => None,
        }
    }

    pub(crate) fn client(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Client {
            message: message.into(),
            status_code,
        }
    }

    pub(crate) fn access_denied(message: impl Into<String>, source: Option<ContentApiError>) -> Self {
        Self::AccessDenied {
            message: message.into(),
            source: source.map(Box::new),
        }
    }
}

/// Result type alias for Content API operations.
pub type Result<T> = core::result::Result<T, ContentApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_only_for_client_errors() {
        let err = ContentApiError::client("boom", Some(500));
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "Content API client error: boom");

        let err = ContentApiError::access_denied("nope", None);
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_access_denied_keeps_source() {
        let err = ContentApiError::access_denied(
            "Could not authenticate against API.",
            Some(ContentApiError::Authentication("bad password".to_string())),
        );
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Authentication failed: bad password"));
    }
}
