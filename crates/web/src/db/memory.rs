//! In-process stores, used when no database is configured and in tests.
//!
//! Each store keeps its rows behind a single `tokio` lock. Locks are held for
//! one operation and never across another await, so every operation is
//! atomic with respect to the others.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use bikeshop_core::{Email, UserId};

use super::{RecordStore, RepositoryError, UserStore};
use crate::models::{Record, User};

fn next_id(counter: &mut i32) -> Result<i32, RepositoryError> {
    *counter = counter
        .checked_add(1)
        .ok_or(RepositoryError::IdsExhausted)?;
    Ok(*counter)
}

struct Table<R: Record> {
    rows: BTreeMap<R::Id, R>,
    last_id: i32,
}

/// In-memory [`RecordStore`] for any record type.
pub struct MemoryRecordStore<R: Record> {
    table: RwLock<Table<R>>,
}

impl<R: Record> Default for MemoryRecordStore<R> {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryRecordStore<R> {
    async fn insert(&self, draft: R::Draft) -> Result<R, RepositoryError> {
        let mut table = self.table.write().await;
        let id = R::Id::from(next_id(&mut table.last_id)?);
        let record = R::assemble(id, draft, Utc::now());
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn list_newest_first(&self) -> Result<Vec<R>, RepositoryError> {
        let table = self.table.read().await;
        let mut records: Vec<R> = table.rows.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(records)
    }

    async fn get(&self, id: R::Id) -> Result<Option<R>, RepositoryError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: R::Id, draft: R::Draft) -> Result<Option<R>, RepositoryError> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|record| {
            record.apply(draft, Utc::now());
            record.clone()
        }))
    }

    async fn delete(&self, id: R::Id) -> Result<bool, RepositoryError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct UserTable {
    by_email: HashMap<Email, StoredUser>,
    last_id: i32,
}

/// In-memory [`UserStore`].
#[derive(Default)]
pub struct MemoryUserStore {
    table: RwLock<UserTable>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.by_email.get(email).map(|stored| stored.user.clone()))
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .values()
            .find(|stored| stored.user.id == id)
            .map(|stored| stored.user.clone()))
    }

    async fn get_password_hash(&self, id: UserId) -> Result<Option<String>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .values()
            .find(|stored| stored.user.id == id)
            .map(|stored| stored.password_hash.clone()))
    }

    async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        // Check and insert under one write lock.
        let mut table = self.table.write().await;
        if table.by_email.contains_key(email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let user = User {
            id: UserId::new(next_id(&mut table.last_id)?),
            name: name.to_owned(),
            email: email.clone(),
            created_at: Utc::now(),
        };
        table.by_email.insert(
            email.clone(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(user)
    }
}
