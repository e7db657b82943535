//! Authentication service.
//!
//! Provides signup and password login against any [`UserStore`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use bikeshop_core::Email;

use crate::db::{RepositoryError, UserStore};
use crate::models::User;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Signup form values, as submitted.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// Checks run in a fixed order and the first failure wins: required
    /// fields, password confirmation, email format, password strength, and
    /// finally email uniqueness (enforced by the store).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if name, email or password is blank.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn signup(&self, account: NewAccount<'_>) -> Result<User, AuthError> {
        let name = account.name.trim();
        if name.is_empty() || account.email.trim().is_empty() || account.password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        if account.password != account.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let email = Email::parse(account.email).map_err(AuthError::InvalidEmail)?;

        validate_password(account.password)?;

        let password_hash = hash_password(account.password)?;

        let user = self
            .users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::IncorrectEmail` if no account matches the email.
    /// Returns `AuthError::IncorrectPassword` if the password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // A malformed address cannot belong to any account.
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::IncorrectEmail);
        };

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::IncorrectEmail)?;

        let password_hash = self
            .users
            .get_password_hash(user.id)
            .await?
            .ok_or(AuthError::IncorrectPassword)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::IncorrectPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::IncorrectPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;

    fn account<'a>(email: &'a str, password: &'a str, confirm: &'a str) -> NewAccount<'a> {
        NewAccount {
            name: "Rider",
            email,
            password,
            confirm_password: confirm,
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);

        let user = auth
            .signup(account("Rider@Example.com", "correct horse", "correct horse"))
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "rider@example.com");

        let logged_in = auth.login("rider@example.com", "correct horse").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);
        let user = auth
            .signup(account("a@example.com", "password123", "password123"))
            .await
            .unwrap();

        let hash = store.get_password_hash(user.id).await.unwrap().unwrap();
        assert_ne!(hash, "password123");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_signup_check_order() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);

        let err = auth.signup(account("", "", "x")).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingFields));

        // Mismatch is reported before the bad email and the short password.
        let err = auth.signup(account("nope", "short", "other")).await.unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");

        let err = auth.signup(account("nope", "short", "short")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));

        let err = auth
            .signup(account("a@example.com", "short", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);
        auth.signup(account("dup@example.com", "password123", "password123"))
            .await
            .unwrap();

        let err = auth
            .signup(account(" DUP@example.com", "password456", "password456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
        assert_eq!(err.to_string(), "Email already in use");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let store = MemoryUserStore::default();
        let auth = AuthService::new(&store);
        auth.signup(account("rider@example.com", "password123", "password123"))
            .await
            .unwrap();

        let err = auth.login("ghost@example.com", "password123").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email.");

        let err = auth.login("not an email", "password123").await.unwrap_err();
        assert!(matches!(err, AuthError::IncorrectEmail));

        let err = auth.login("rider@example.com", "wrong-password").await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password.");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AuthError::PasswordHash;
        assert!(err.is_server_error());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert_eq!(AuthError::PasswordMismatch.user_message(), "Passwords do not match");
    }
}
