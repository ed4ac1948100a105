//! Error types for text sources.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that make the text source unusable for this run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// Request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The API refused the credentials.
    #[error("search API rejected the credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The API rate limit is exhausted.
    #[error("search API rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-success response.
    #[error("search API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Could not compute the request signature.
    #[error("request signing failed: {0}")]
    Signing(String),

    /// Saved search file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Returns a short explanation suitable for an operator.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Can not reach the search API. Check your Internet connection.",
            Self::Unauthorized { .. } => "The search API rejected the request. Check your API credentials.",
            Self::RateLimited { .. } => "The search API rate limit was reached. Try again later.",
            Self::Api { .. } | Self::JsonParse(_) | Self::Signing(_) => {
                "The search API returned an unexpected response."
            }
            Self::Io { .. } => "The saved search file could not be read.",
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type for text source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = SourceError::Network("connection refused".to_string());
        assert!(err.user_message().contains("Internet connection"));

        let err = SourceError::Unauthorized {
            status: 401,
            message: "bad token".to_string(),
        };
        assert!(err.user_message().contains("credentials"));
        assert!(err.to_string().contains("401"));
    }
}
