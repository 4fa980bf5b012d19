//! API error types for the PokeBase client.

use thiserror::Error;

/// Errors that can occur when talking to a PokeBase server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the server or a proxy in front of it.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// PokeBase server error.
    #[error("PokeBase server error: {0}")]
    ServerError(String),

    /// Any other non-success status.
    #[error("Unexpected HTTP {status}: {context}")]
    UnexpectedStatus { status: u16, context: String },

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response body.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The request was superseded and cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            code => ApiError::UnexpectedStatus {
                status: code,
                context: context.to_string(),
            },
        }
    }

    /// Whether this error came from a cancelled request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}
