//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::WebConfig;
use crate::db::Stores;
use crate::models::{Bike, Buyer, Contact, Feedback};
use crate::services::{AuthService, RecordService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the stores and configuration. It replaces any
/// process-global state: everything a handler touches comes through here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    stores: Stores,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Web configuration
    /// * `stores` - Record and credential stores
    /// * `pool` - `PostgreSQL` pool backing the stores, if any (used by the
    ///   readiness check)
    #[must_use]
    pub fn new(config: WebConfig, stores: Stores, pool: Option<PgPool>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                stores,
                pool,
            }),
        }
    }

    /// State backed by fresh in-memory stores.
    #[must_use]
    pub fn in_memory(config: WebConfig) -> Self {
        Self::new(config, Stores::in_memory(), None)
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the stores.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get a reference to the database connection pool, if one is configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Authentication service over the user store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.inner.stores.users.as_ref())
    }

    /// Bike record service.
    #[must_use]
    pub fn bikes(&self) -> RecordService<'_, Bike> {
        RecordService::new(self.inner.stores.bikes.as_ref())
    }

    /// Buyer record service.
    #[must_use]
    pub fn buyers(&self) -> RecordService<'_, Buyer> {
        RecordService::new(self.inner.stores.buyers.as_ref())
    }

    /// Feedback record service.
    #[must_use]
    pub fn feedback(&self) -> RecordService<'_, Feedback> {
        RecordService::new(self.inner.stores.feedback.as_ref())
    }

    /// Contact message record service.
    #[must_use]
    pub fn contacts(&self) -> RecordService<'_, Contact> {
        RecordService::new(self.inner.stores.contacts.as_ref())
    }
}
