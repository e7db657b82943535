//! The [`Record`] trait shared by every CRUD-managed record type.
//!
//! Bikes, buyers, feedback and contact messages all follow the same life
//! cycle: a submitted form is validated into a draft, the store assigns an
//! id and creation time, and later drafts replace the editable fields.
//! Stores and the record service are written once against this trait.

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use super::validation::ValidationError;

/// A record type managed through the generic create/list/update/delete flow.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    /// Store-assigned identifier.
    type Id: Copy
        + Eq
        + Ord
        + Hash
        + Debug
        + Display
        + FromStr
        + From<i32>
        + Into<i32>
        + Send
        + Sync
        + 'static;

    /// Validated, store-ready field values.
    type Draft: Clone + Debug + Send + Sync + 'static;

    /// Raw form body as submitted by the browser.
    type Form: DeserializeOwned + Send + 'static;

    /// Singular display name (e.g. "Bike").
    const SINGULAR: &'static str;

    /// Plural, lowercase name used in messages (e.g. "bikes").
    const PLURAL: &'static str;

    /// Validate a submitted form into a draft.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn validate(form: Self::Form) -> Result<Self::Draft, ValidationError>;

    /// The record's id.
    fn id(&self) -> Self::Id;

    /// When the record was created.
    fn created_at(&self) -> DateTime<Utc>;

    /// Build a stored record from its parts.
    fn assemble(id: Self::Id, draft: Self::Draft, created_at: DateTime<Utc>) -> Self;

    /// Replace the editable fields with `draft`. Id and creation time stay.
    fn apply(&mut self, draft: Self::Draft, now: DateTime<Utc>);
}
