//! Bike inventory storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bikeshop_core::{BikeId, Price};

use super::{RecordStore, RepositoryError};
use crate::models::{Bike, BikeDraft};

#[derive(sqlx::FromRow)]
struct BikeRow {
    id: BikeId,
    model: String,
    brand: String,
    price: Price,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BikeRow> for Bike {
    fn from(row: BikeRow) -> Self {
        Self {
            id: row.id,
            model: row.model,
            brand: row.brand,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, model, brand, price, quantity, created_at, updated_at";

/// `PostgreSQL` bike store.
#[derive(Debug, Clone)]
pub struct PgBikeStore {
    pool: PgPool,
}

impl PgBikeStore {
    /// Create a new bike store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Bike> for PgBikeStore {
    async fn insert(&self, draft: BikeDraft) -> Result<Bike, RepositoryError> {
        let row = sqlx::query_as::<_, BikeRow>(&format!(
            r"
            INSERT INTO bikeshop.bike (model, brand, price, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&draft.model)
        .bind(&draft.brand)
        .bind(draft.price)
        .bind(draft.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_newest_first(&self) -> Result<Vec<Bike>, RepositoryError> {
        let rows = sqlx::query_as::<_, BikeRow>(&format!(
            "SELECT {COLUMNS} FROM bikeshop.bike ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Bike::from).collect())
    }

    async fn get(&self, id: BikeId) -> Result<Option<Bike>, RepositoryError> {
        let row = sqlx::query_as::<_, BikeRow>(&format!(
            "SELECT {COLUMNS} FROM bikeshop.bike WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Bike::from))
    }

    async fn update(&self, id: BikeId, draft: BikeDraft) -> Result<Option<Bike>, RepositoryError> {
        let row = sqlx::query_as::<_, BikeRow>(&format!(
            r"
            UPDATE bikeshop.bike
            SET model = $2, brand = $3, price = $4, quantity = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.model)
        .bind(&draft.brand)
        .bind(draft.price)
        .bind(draft.quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Bike::from))
    }

    async fn delete(&self, id: BikeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM bikeshop.bike WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
