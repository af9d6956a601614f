//! Centralized error types for issuedesk.
//!
//! This module provides the application-level error hierarchy with
//! user-friendly messages. Views handle their own request failures locally;
//! this type covers startup and the outermost shell.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::route::RouteError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Navigation to a path that names no screen.
    #[error("{0}")]
    Route(#[from] RouteError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "No config directory on this system; set ISSUEDESK_CONFIG to a file path."
                        .to_string()
                }
                ConfigError::CreateDirError(e) => format!("Cannot create the config directory: {}", e),
                ConfigError::ReadError(e) => format!("Cannot read the config file: {}", e),
                ConfigError::WriteError(e) => format!("Cannot write the config file: {}", e),
                ConfigError::ParseError(e) => format!("The config file is not valid TOML: {}", e),
                ConfigError::SerializeError(e) => format!("Cannot encode the config: {}", e),
                ConfigError::ValidationError(msg) => format!("Bad config value: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::NotFound(resource) => format!("{} was not found.", resource),
                ApiError::Validation(msg) => format!("The server rejected the request: {}", msg),
                ApiError::ServerError(_) => {
                    "The issue service failed. Please try again later.".to_string()
                }
                ApiError::Network(_) | ApiError::ConnectionFailed(_) => {
                    "Could not reach the issue service. Please check the URL and network."
                        .to_string()
                }
                ApiError::InvalidUrl(url) => format!("Invalid issue service URL: {}", url),
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from the issue service.".to_string()
                }
            },
            AppError::Route(e) => e.to_string(),
            AppError::Io(e) => format!("I/O failure: {}", e),
            AppError::Terminal(msg) => format!("Cannot drive the terminal: {}", msg),
        }
    }

    /// Check if this error prevents the application from starting.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::Route(_)
                | AppError::Terminal(_)
                | AppError::Api(ApiError::InvalidUrl(_))
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix the config file, or point ISSUEDESK_CONFIG at another one.")
            }
            AppError::Api(ApiError::InvalidUrl(_)) => {
                Some("Pass --api-url with an http:// or https:// URL.")
            }
            AppError::Api(ApiError::Network(_)) | AppError::Api(ApiError::ConnectionFailed(_)) => {
                Some("Check that the issue service is running, e.g. with 'issuedesk health'.")
            }
            AppError::Route(_) => Some("Use /issues or /issues/<id>."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_api_error() {
        let app_err: AppError = ApiError::NotFound("Issue 4".to_string()).into();
        assert!(matches!(app_err, AppError::Api(ApiError::NotFound(_))));
    }

    #[test]
    fn test_user_message_not_found() {
        let err = AppError::Api(ApiError::NotFound("Issue 12".to_string()));
        let msg = err.user_message();
        assert!(msg.contains("Issue 12"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_user_message_connection_failed() {
        let err = AppError::Api(ApiError::ConnectionFailed("refused".to_string()));
        assert!(err.user_message().contains("Could not reach"));
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError("page_size".to_string()));
        assert!(err.user_message().contains("page_size"));
    }

    #[test]
    fn test_route_error_message() {
        let err: AppError = RouteError::Unknown("/projects".to_string()).into();
        assert!(err.user_message().contains("/projects"));
        assert!(err.is_critical());
        assert!(err.suggested_action().is_some());
    }

    #[test]
    fn test_is_critical() {
        assert!(AppError::Config(ConfigError::NoConfigDir).is_critical());
        assert!(AppError::terminal("no tty").is_critical());
        assert!(!AppError::Api(ApiError::NotFound("x".to_string())).is_critical());
    }

    #[test]
    fn test_suggested_action_connection() {
        let err = AppError::Api(ApiError::ConnectionFailed("refused".to_string()));
        assert!(err.suggested_action().unwrap().contains("health"));
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("test error");
        assert_eq!(err.user_message(), "Cannot drive the terminal: test error");
    }
}
