//! Client error types

use std::collections::HashMap;

use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with a readable error body
    #[error("{message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
        details: Option<HashMap<String, Value>>,
    },

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Message suitable for a user-facing notification
    ///
    /// Prefers the backend's own message; falls back to `fallback` for
    /// transport-level failures whose text is not meant for end users.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Forbidden(m) | Self::NotFound(m) | Self::Validation(m)
                if !m.trim().is_empty() =>
            {
                m.clone()
            }
            _ => fallback.to_string(),
        }
    }

    /// Whether the backend answered 404
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Convert into the workspace-wide [`AppError`]
    pub fn to_app_error(&self) -> AppError {
        match self {
            Self::Api {
                code,
                message,
                details,
                ..
            } => AppError {
                code: *code,
                message: message.clone(),
                details: details.clone(),
            },
            Self::Http(e) if e.is_timeout() => AppError::new(ErrorCode::TimeoutError),
            Self::Http(_) => AppError::new(ErrorCode::NetworkError),
            Self::Unauthorized => AppError::new(ErrorCode::NotAuthenticated),
            Self::Forbidden(m) => AppError::with_message(ErrorCode::PermissionDenied, m),
            Self::NotFound(m) => AppError::with_message(ErrorCode::NotFound, m),
            Self::Validation(m) => AppError::validation(m),
            Self::Config(m) => AppError::with_message(ErrorCode::ConfigError, m),
            other => AppError::internal(other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ClientError::Api {
            status: 409,
            code: ErrorCode::ShippingFeeExists,
            message: "Fee for 16 → 31 already exists".into(),
            details: None,
        };
        assert_eq!(err.user_message("Failed to save"), "Fee for 16 → 31 already exists");
        assert_eq!(err.to_app_error().code, ErrorCode::ShippingFeeExists);
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ClientError::Internal("boom".into());
        assert_eq!(err.user_message("Failed to save"), "Failed to save");

        let err = ClientError::Validation(" ".into());
        assert_eq!(err.user_message("Failed to save"), "Failed to save");
    }

    #[test]
    fn test_is_not_found() {
        assert!(ClientError::NotFound("fee".into()).is_not_found());
        let err = ClientError::Api {
            status: 404,
            code: ErrorCode::ZoneNotFound,
            message: "gone".into(),
            details: None,
        };
        assert!(err.is_not_found());
        assert!(!ClientError::Unauthorized.is_not_found());
    }
}
