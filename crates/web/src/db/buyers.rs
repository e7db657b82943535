//! Buyer lead storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bikeshop_core::{BuyerId, Email};

use super::{RecordStore, RepositoryError};
use crate::models::{Buyer, BuyerDraft};

#[derive(sqlx::FromRow)]
struct BuyerRow {
    id: BuyerId,
    name: String,
    email: String,
    phone: String,
    interested_bike: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BuyerRow> for Buyer {
    type Error = RepositoryError;

    fn try_from(row: BuyerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid buyer email in database: {e}"))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            phone: row.phone,
            interested_bike: row.interested_bike,
            created_at: row.created_at,
        })
    }
}

const COLUMNS: &str = "id, name, email, phone, interested_bike, created_at";

/// `PostgreSQL` buyer store.
#[derive(Debug, Clone)]
pub struct PgBuyerStore {
    pool: PgPool,
}

impl PgBuyerStore {
    /// Create a new buyer store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Buyer> for PgBuyerStore {
    async fn insert(&self, draft: BuyerDraft) -> Result<Buyer, RepositoryError> {
        let row = sqlx::query_as::<_, BuyerRow>(&format!(
            r"
            INSERT INTO bikeshop.buyer (name, email, phone, interested_bike)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&draft.name)
        .bind(draft.email.as_str())
        .bind(&draft.phone)
        .bind(&draft.interested_bike)
        .fetch_one(&self.pool)
        .await?;

        Buyer::try_from(row)
    }

    async fn list_newest_first(&self) -> Result<Vec<Buyer>, RepositoryError> {
        sqlx::query_as::<_, BuyerRow>(&format!(
            "SELECT {COLUMNS} FROM bikeshop.buyer ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Buyer::try_from)
        .collect()
    }

    async fn get(&self, id: BuyerId) -> Result<Option<Buyer>, RepositoryError> {
        sqlx::query_as::<_, BuyerRow>(&format!(
            "SELECT {COLUMNS} FROM bikeshop.buyer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Buyer::try_from)
        .transpose()
    }

    async fn update(
        &self,
        id: BuyerId,
        draft: BuyerDraft,
    ) -> Result<Option<Buyer>, RepositoryError> {
        sqlx::query_as::<_, BuyerRow>(&format!(
            r"
            UPDATE bikeshop.buyer
            SET name = $2, email = $3, phone = $4, interested_bike = $5
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(draft.email.as_str())
        .bind(&draft.phone)
        .bind(&draft.interested_bike)
        .fetch_optional(&self.pool)
        .await?
        .map(Buyer::try_from)
        .transpose()
    }

    async fn delete(&self, id: BuyerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM bikeshop.buyer WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
