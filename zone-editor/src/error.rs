//! Editor error types

use fee_client::ClientError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::zone::ZoneRef;

/// Errors returned by editor operations
#[derive(Debug, Error)]
pub enum EditorError {
    /// Local validation failed; nothing was sent
    #[error("{0}")]
    Validation(AppError),

    /// A load is pending; the partition is not ready for edits
    #[error("Editor is still loading")]
    NotReady,

    #[error("A save is already in progress")]
    SaveInProgress,

    #[error("Unknown zone: {0}")]
    UnknownZone(ZoneRef),

    #[error("Editor is closed")]
    Closed,

    /// The load result belongs to a superseded load and was discarded
    #[error("Load result is stale")]
    StaleLoad,

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl EditorError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(AppError::validation(msg))
    }

    /// Message suitable for a user-facing notice
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Client(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }

    /// Convert into the workspace-wide [`AppError`]
    pub fn to_app_error(&self) -> AppError {
        match self {
            Self::Validation(e) => e.clone(),
            Self::UnknownZone(zone) => AppError::with_message(ErrorCode::ZoneNotFound, self.to_string())
                .with_detail("zone", zone.to_string()),
            Self::Client(e) => e.to_app_error(),
            other => AppError::with_message(ErrorCode::InvalidRequest, other.to_string()),
        }
    }
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keeps_code() {
        let err = EditorError::Validation(AppError::invalid_price("homePrice"));
        assert_eq!(err.to_app_error().code, ErrorCode::InvalidPrice);
        assert_eq!(
            err.to_string(),
            "All prices must be valid numbers greater than or equal to 0"
        );
    }

    #[test]
    fn test_unknown_zone_maps_to_zone_not_found() {
        let err = EditorError::UnknownZone(ZoneRef::Persisted(7));
        let app = err.to_app_error();
        assert_eq!(app.code, ErrorCode::ZoneNotFound);
        assert_eq!(app.details.unwrap()["zone"], "7");
    }

    #[test]
    fn test_client_message_passthrough() {
        let err = EditorError::from(ClientError::Validation("zones must be an array".into()));
        assert_eq!(err.user_message("Failed to save"), "zones must be an array");

        let err = EditorError::from(ClientError::Internal("boom".into()));
        assert_eq!(err.user_message("Failed to save"), "Failed to save");
    }

    #[test]
    fn test_state_errors_are_invalid_requests() {
        assert_eq!(
            EditorError::SaveInProgress.to_app_error().code,
            ErrorCode::InvalidRequest
        );
        assert_eq!(EditorError::NotReady.user_message("x"), "Editor is still loading");
    }
}
