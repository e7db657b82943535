//! Authentication error types.

use thiserror::Error;

use bikeshop_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// The `Display` text of every client-side variant is safe to show to the
/// user; server-side variants are reported as a generic failure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Name, email or password left blank.
    #[error("Name, email and password are required")]
    MissingFields,

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Invalid email format.
    #[error("Please enter a valid email address")]
    InvalidEmail(#[source] EmailError),

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// Email already registered.
    #[error("Email already in use")]
    UserAlreadyExists,

    /// No account for the given email.
    #[error("Incorrect email.")]
    IncorrectEmail,

    /// Password does not match the stored hash.
    #[error("Incorrect password.")]
    IncorrectPassword,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the failure lies with the server rather than the submitted
    /// credentials.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PasswordHash)
    }

    /// Message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_server_error() {
            "Something went wrong. Please try again.".to_owned()
        } else {
            self.to_string()
        }
    }
}
