//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! bikeshop user create -n "Ada Lovelace" -e ada@example.com -p 'correct horse battery'
//! ```
//!
//! Users are created through the same rules as the signup form, so the
//! email is normalized and the password is checked and hashed identically.

use thiserror::Error;

use bikeshop_web::db::{PgUserStore, create_pool};
use bikeshop_web::services::{AuthError, AuthService, NewAccount};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Signup rules rejected the user.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError::Auth` if the details fail validation or the email is
/// already registered.
pub async fn create(name: &str, email: &str, password: &str) -> Result<i32, UserError> {
    let database_url =
        super::database_url().ok_or(UserError::MissingEnvVar("BIKESHOP_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let users = PgUserStore::new(pool);

    let user = AuthService::new(&users)
        .signup(NewAccount {
            name,
            email,
            password,
            confirm_password: password,
        })
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id.as_i32())
}
