//! Generic record service.
//!
//! One implementation of the create/list/update/delete contract shared by
//! bikes, buyers, feedback and contact messages.

use thiserror::Error;
use tracing::instrument;

use crate::db::{RecordStore, RepositoryError};
use crate::models::{Record, ValidationError};

/// Errors from record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The submitted form failed validation; nothing was stored.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record with the requested id.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The store failed.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Result of listing records. A store failure degrades to an empty list and
/// an error message instead of failing the page.
#[derive(Debug)]
pub struct Listing<R> {
    pub records: Vec<R>,
    pub error: Option<String>,
}

/// Record operations for one record type.
pub struct RecordService<'a, R: Record> {
    store: &'a dyn RecordStore<R>,
}

impl<'a, R: Record> RecordService<'a, R> {
    /// Create a record service over `store`.
    #[must_use]
    pub const fn new(store: &'a dyn RecordStore<R>) -> Self {
        Self { store }
    }

    /// All records, newest first.
    #[instrument(skip(self), fields(records = R::PLURAL))]
    pub async fn list(&self) -> Listing<R> {
        match self.store.list_newest_first().await {
            Ok(records) => Listing {
                records,
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to list {}", R::PLURAL);
                Listing {
                    records: Vec::new(),
                    error: Some(format!("Failed to fetch {}", R::PLURAL)),
                }
            }
        }
    }

    /// Validate and store a new record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Validation` without touching the store if the
    /// form is invalid, `RecordError::Store` if the store fails.
    #[instrument(skip(self, form), fields(records = R::PLURAL))]
    pub async fn create(&self, form: R::Form) -> Result<R, RecordError> {
        let draft = R::validate(form)?;
        let record = self.store.insert(draft).await?;
        tracing::info!(id = %record.id(), "{} created", R::SINGULAR);
        Ok(record)
    }

    /// Replace a record's fields.
    ///
    /// Existence is checked before validation, so an unknown id reports
    /// not found even when the form is also invalid.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotFound` if `id` does not name a record,
    /// `RecordError::Validation` if the form is invalid.
    #[instrument(skip(self, form), fields(records = R::PLURAL))]
    pub async fn update(&self, id: &str, form: R::Form) -> Result<R, RecordError> {
        let id = Self::parse_id(id)?;
        if self.store.get(id).await?.is_none() {
            return Err(RecordError::NotFound(R::SINGULAR));
        }
        let draft = R::validate(form)?;
        let record = self
            .store
            .update(id, draft)
            .await?
            .ok_or(RecordError::NotFound(R::SINGULAR))?;
        tracing::info!(%id, "{} updated", R::SINGULAR);
        Ok(record)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotFound` if `id` does not name a record.
    #[instrument(skip(self), fields(records = R::PLURAL))]
    pub async fn delete(&self, id: &str) -> Result<(), RecordError> {
        let id = Self::parse_id(id)?;
        if !self.store.delete(id).await? {
            return Err(RecordError::NotFound(R::SINGULAR));
        }
        tracing::info!(%id, "{} deleted", R::SINGULAR);
        Ok(())
    }

    /// Ids that don't parse can't name a record.
    fn parse_id(raw: &str) -> Result<R::Id, RecordError> {
        raw.parse().map_err(|_| RecordError::NotFound(R::SINGULAR))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use bikeshop_core::BikeId;

    use super::*;
    use crate::db::MemoryRecordStore;
    use crate::models::{Bike, BikeDraft, BikeForm};

    fn form(model: &str, price: &str, quantity: &str) -> BikeForm {
        BikeForm {
            model: model.to_owned(),
            brand: "Acme".to_owned(),
            price: price.to_owned(),
            quantity: quantity.to_owned(),
        }
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl RecordStore<Bike> for BrokenStore {
        async fn insert(&self, _: BikeDraft) -> Result<Bike, RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_owned()))
        }
        async fn list_newest_first(&self) -> Result<Vec<Bike>, RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_owned()))
        }
        async fn get(&self, _: BikeId) -> Result<Option<Bike>, RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_owned()))
        }
        async fn update(&self, _: BikeId, _: BikeDraft) -> Result<Option<Bike>, RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_owned()))
        }
        async fn delete(&self, _: BikeId) -> Result<bool, RepositoryError> {
            Err(RepositoryError::DataCorruption("broken".to_owned()))
        }
    }

    #[tokio::test]
    async fn test_create_then_list_newest_first() {
        let store = MemoryRecordStore::<Bike>::default();
        let service = RecordService::new(&store);
        service.create(form("Older", "500", "1")).await.unwrap();
        let created = service.create(form("Model X", "1000", "5")).await.unwrap();

        let listing = service.list().await;
        assert!(listing.error.is_none());
        assert_eq!(listing.records.first(), Some(&created));
        assert_eq!(listing.records.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_create_stores_nothing() {
        let store = MemoryRecordStore::<Bike>::default();
        let service = RecordService::new(&store);

        let err = service.create(form("Model X", "-5", "1")).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(ref v) if v.field == "price"));
        let err = service.create(form("Model X", "5", "-1")).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(ref v) if v.field == "quantity"));

        assert!(service.list().await.records.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found_before_validation() {
        let store = MemoryRecordStore::<Bike>::default();
        let service = RecordService::new(&store);
        let existing = service.create(form("Roadster", "10", "1")).await.unwrap();

        let err = service.update("999", form("", "", "")).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound("Bike")));
        let err = service.update("abc", form("Gravel", "10", "1")).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));

        assert_eq!(service.list().await.records, vec![existing]);
    }

    #[tokio::test]
    async fn test_update_validates_existing_record() {
        let store = MemoryRecordStore::<Bike>::default();
        let service = RecordService::new(&store);
        let existing = service.create(form("Roadster", "10", "1")).await.unwrap();

        let err = service
            .update(&existing.id.to_string(), form("X", "10", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));

        let updated = service
            .update(&existing.id.to_string(), form("Gravel", "12", ""))
            .await
            .unwrap();
        assert_eq!(updated.quantity, 0);
        assert_eq!(updated.created_at, existing.created_at);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryRecordStore::<Bike>::default();
        let service = RecordService::new(&store);
        let existing = service.create(form("Roadster", "10", "1")).await.unwrap();

        service.delete(&existing.id.to_string()).await.unwrap();
        let err = service.delete(&existing.id.to_string()).await.unwrap_err();
        assert_eq!(err.to_string(), "Bike not found");
    }

    #[tokio::test]
    async fn test_list_degrades_on_store_failure() {
        let service = RecordService::<Bike>::new(&BrokenStore);
        let listing = service.list().await;
        assert!(listing.records.is_empty());
        assert_eq!(listing.error.as_deref(), Some("Failed to fetch bikes"));
    }
}
