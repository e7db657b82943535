//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! bikeshop migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BIKESHOP_DATABASE_URL` - `PostgreSQL` connection string (fallback: `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Application migrations live in `crates/web/migrations/`. The session
//! table is created by `tower-sessions-sqlx-store` itself.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use bikeshop_web::db::create_pool;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url =
        super::database_url().ok_or(MigrationError::MissingEnvVar("BIKESHOP_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running application migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
