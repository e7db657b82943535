//! Field-level validation errors for submitted forms.

use thiserror::Error;

/// A submitted form failed validation.
///
/// Carries the offending field so the caller can point at it, and a message
/// that is safe to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Form field that failed validation.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trim `value` and reject it when nothing is left.
///
/// # Errors
///
/// Returns a [`ValidationError`] for `field` with `message` if the trimmed
/// value is empty.
pub fn required(field: &'static str, value: &str, message: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, message));
    }
    Ok(trimmed.to_owned())
}
