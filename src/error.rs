//! Centralized error types for PokeBase.
//!
//! Aggregates the module errors into one type with user-friendly messages
//! for the toast area. All error types use `thiserror`.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::clipboard::ClipboardError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Clipboard errors.
    #[error("{0}")]
    Clipboard(#[from] ClipboardError),

    /// IO errors (file system, launching the browser).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get a user-friendly message for display.
    ///
    /// Suitable for a toast: no technical jargon or stack traces.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check it is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save preferences. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save preferences. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::NotFound(resource) => format!("{} was not found.", resource),
                ApiError::RateLimited => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::ServerError(_) => {
                    "PokeBase server error. Please try again later.".to_string()
                }
                ApiError::UnexpectedStatus { status, .. } => {
                    format!("PokeBase answered with HTTP {}.", status)
                }
                ApiError::Network(_) => {
                    "Could not reach PokeBase. Is the server running?".to_string()
                }
                ApiError::InvalidUrl(url) => format!("Invalid PokeBase URL: {}", url),
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from PokeBase. Please try again.".to_string()
                }
                ApiError::Cancelled => "Request cancelled.".to_string(),
            },
            AppError::Clipboard(_) => "Could not copy to the clipboard.".to_string(),
            AppError::Io(_) => "A system operation failed. See the log for details.".to_string(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors can be retried or the user can continue working.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Api(ApiError::RateLimited)
                | AppError::Api(ApiError::ServerError(_))
                | AppError::Api(ApiError::Network(_))
                | AppError::Api(ApiError::NotFound(_))
                | AppError::Api(ApiError::UnexpectedStatus { .. })
                | AppError::Api(ApiError::InvalidResponse(_))
                | AppError::Api(ApiError::Cancelled)
                | AppError::Clipboard(_)
                | AppError::Io(_)
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Api(ApiError::Network(_)) => {
                Some("Start the PokeBase server or pass --url to point at another instance.")
            }
            AppError::Api(ApiError::NotFound(_)) => {
                Some("Check the spelling. The server must serve /api/pokemon/<name>.")
            }
            AppError::Api(ApiError::InvalidUrl(_)) => {
                Some("Use an http:// or https:// base URL.")
            }
            AppError::Config(ConfigError::ParseError(_)) => {
                Some("Fix or delete config.toml to fall back to defaults.")
            }
            _ => None,
        }
    }
}
