//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Handlers that answer with plain text return
//! `Result<T, AppError>`; form handlers that redirect map errors themselves.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::RecordError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed outside a record service (e.g. resolving the
    /// signed-in user).
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Record operation failed.
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    /// Whether this error is the server's fault.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Session(_) => true,
            Self::Record(err) => matches!(err, RecordError::Store(_)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            // Don't expose internal error details to clients
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }

        let status = match &self {
            Self::Record(RecordError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        let message = match &self {
            Self::Record(err) => err.to_string(),
            other => other.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_record_errors_map_to_status() {
        let validation = RecordError::Validation(ValidationError::new("message", "Missing"));
        assert_eq!(get_status(validation.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(RecordError::NotFound("Bike").into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_store_failures_are_internal() {
        let store = RecordError::Store(RepositoryError::DataCorruption("bad row".to_string()));
        assert_eq!(get_status(store.into()), StatusCode::INTERNAL_SERVER_ERROR);

        let lookup = AppError::Database(RepositoryError::IdsExhausted);
        assert!(lookup.is_server_error());
        assert_eq!(get_status(lookup), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_message_is_the_body() {
        let err: AppError = RecordError::Validation(ValidationError::new(
            "message",
            "Missing required field: message",
        ))
        .into();
        let body = axum::body::to_bytes(err.into_response().into_body(), 1024)
            .await
            .unwrap_or_default();
        assert_eq!(&body[..], b"Missing required field: message");
    }
}
