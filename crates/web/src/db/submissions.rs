//! Feedback and contact message storage.
//!
//! Both kinds share the `submission` table; every query is scoped by the
//! kind discriminator so one store never sees the other's rows.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use bikeshop_core::SubmissionId;

use super::{RecordStore, RepositoryError};
use crate::models::submission::{Payload, Submission, SubmissionKind};

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: SubmissionId,
    payload: Json<Payload>,
    created_at: DateTime<Utc>,
}

impl<K> From<SubmissionRow> for Submission<K> {
    fn from(row: SubmissionRow) -> Self {
        Self::new(row.id, row.payload.0, row.created_at)
    }
}

/// `PostgreSQL` store for submissions of kind `K`.
pub struct PgSubmissionStore<K> {
    pool: PgPool,
    kind: PhantomData<fn() -> K>,
}

impl<K> PgSubmissionStore<K> {
    /// Create a new submission store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self {
            pool,
            kind: PhantomData,
        }
    }
}

#[async_trait]
impl<K: SubmissionKind> RecordStore<Submission<K>> for PgSubmissionStore<K> {
    async fn insert(&self, draft: Payload) -> Result<Submission<K>, RepositoryError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r"
            INSERT INTO bikeshop.submission (kind, payload)
            VALUES ($1, $2)
            RETURNING id, payload, created_at
            ",
        )
        .bind(K::KIND)
        .bind(Json(&draft))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_newest_first(&self) -> Result<Vec<Submission<K>>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r"
            SELECT id, payload, created_at
            FROM bikeshop.submission
            WHERE kind = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(K::KIND)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn get(&self, id: SubmissionId) -> Result<Option<Submission<K>>, RepositoryError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r"
            SELECT id, payload, created_at
            FROM bikeshop.submission
            WHERE id = $1 AND kind = $2
            ",
        )
        .bind(id)
        .bind(K::KIND)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Submission::from))
    }

    async fn update(
        &self,
        id: SubmissionId,
        draft: Payload,
    ) -> Result<Option<Submission<K>>, RepositoryError> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r"
            UPDATE bikeshop.submission
            SET payload = $3
            WHERE id = $1 AND kind = $2
            RETURNING id, payload, created_at
            ",
        )
        .bind(id)
        .bind(K::KIND)
        .bind(Json(&draft))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Submission::from))
    }

    async fn delete(&self, id: SubmissionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM bikeshop.submission WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(K::KIND)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
