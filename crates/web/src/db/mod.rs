//! Record and credential storage.
//!
//! Every store is reached through an object-safe trait so handlers never know
//! which backend they run against:
//!
//! - [`UserStore`] - accounts and password hashes
//! - [`RecordStore`] - bikes, buyers, feedback and contact messages
//!
//! Two backends implement them: `PostgreSQL` ([`users`], [`bikes`],
//! [`buyers`], [`submissions`]) and in-process maps ([`memory`]), used when
//! no database is configured.
//!
//! # Tables (schema `bikeshop`)
//!
//! - `user_account` - Site authentication, unique on `email`
//! - `bike` - Inventory
//! - `buyer` - Lead capture
//! - `submission` - Feedback and contact payloads (JSONB), keyed by `kind`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p bikeshop-cli -- migrate
//! ```

pub mod bikes;
pub mod buyers;
pub mod memory;
pub mod submissions;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::models::submission::{ContactKind, FeedbackKind};
use crate::models::{Bike, Buyer, Contact, Feedback, Record};

pub use bikes::PgBikeStore;
pub use buyers::PgBuyerStore;
pub use memory::{MemoryRecordStore, MemoryUserStore};
pub use submissions::PgSubmissionStore;
pub use users::{PgUserStore, UserStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// An in-memory store has handed out every id it can represent.
    #[error("id space exhausted")]
    IdsExhausted,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-index violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(what.to_owned());
    }
    RepositoryError::Database(e)
}

/// Storage for one record type.
///
/// Implementations assign ids and creation times; `list_newest_first`
/// orders by creation time, then id, both descending.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, draft: R::Draft) -> Result<R, RepositoryError>;

    /// All records, newest first.
    async fn list_newest_first(&self) -> Result<Vec<R>, RepositoryError>;

    /// Fetch one record.
    async fn get(&self, id: R::Id) -> Result<Option<R>, RepositoryError>;

    /// Replace a record's editable fields. `None` if no record has `id`.
    async fn update(&self, id: R::Id, draft: R::Draft) -> Result<Option<R>, RepositoryError>;

    /// Remove a record. `false` if no record has `id`.
    async fn delete(&self, id: R::Id) -> Result<bool, RepositoryError>;
}

/// The full set of stores the application runs against.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub bikes: Arc<dyn RecordStore<Bike>>,
    pub buyers: Arc<dyn RecordStore<Buyer>>,
    pub feedback: Arc<dyn RecordStore<Feedback>>,
    pub contacts: Arc<dyn RecordStore<Contact>>,
}

impl Stores {
    /// Stores backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            bikes: Arc::new(PgBikeStore::new(pool.clone())),
            buyers: Arc::new(PgBuyerStore::new(pool.clone())),
            feedback: Arc::new(PgSubmissionStore::<FeedbackKind>::new(pool.clone())),
            contacts: Arc::new(PgSubmissionStore::<ContactKind>::new(pool.clone())),
        }
    }

    /// Empty in-process stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::default()),
            bikes: Arc::new(MemoryRecordStore::<Bike>::default()),
            buyers: Arc::new(MemoryRecordStore::<Buyer>::default()),
            feedback: Arc::new(MemoryRecordStore::<Feedback>::default()),
            contacts: Arc::new(MemoryRecordStore::<Contact>::default()),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
