//! Free-form visitor submissions: feedback and contact messages.
//!
//! Both kinds keep whatever fields the visitor submitted as a string map.
//! Each kind names the fields that must be present and non-blank.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};

use bikeshop_core::SubmissionId;

use super::record::Record;
use super::validation::ValidationError;

/// Submitted fields, keyed by form field name.
pub type Payload = BTreeMap<String, String>;

/// Maximum number of fields accepted in one submission.
pub const MAX_FIELDS: usize = 32;

/// Maximum length of a single field value, in characters.
pub const MAX_VALUE_CHARS: usize = 5_000;

/// Distinguishes the submission kinds sharing one storage shape.
pub trait SubmissionKind: Send + Sync + 'static {
    /// Discriminator stored alongside each submission.
    const KIND: &'static str;
    /// Singular display name.
    const SINGULAR: &'static str;
    /// Plural, lowercase name used in messages.
    const PLURAL: &'static str;
    /// Fields that must be present and non-blank.
    const REQUIRED: &'static [&'static str];
}

/// Marker for site feedback.
#[derive(Debug)]
pub enum FeedbackKind {}

impl SubmissionKind for FeedbackKind {
    const KIND: &'static str = "feedback";
    const SINGULAR: &'static str = "Feedback";
    const PLURAL: &'static str = "feedback";
    const REQUIRED: &'static [&'static str] = &["message"];
}

/// Marker for contact-form messages.
#[derive(Debug)]
pub enum ContactKind {}

impl SubmissionKind for ContactKind {
    const KIND: &'static str = "contact";
    const SINGULAR: &'static str = "Contact message";
    const PLURAL: &'static str = "contact messages";
    const REQUIRED: &'static [&'static str] = &["name", "email", "message"];
}

/// A stored submission of kind `K`.
pub struct Submission<K> {
    pub id: SubmissionId,
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    kind: PhantomData<fn() -> K>,
}

/// Site feedback.
pub type Feedback = Submission<FeedbackKind>;

/// Contact-form message.
pub type Contact = Submission<ContactKind>;

impl<K> Submission<K> {
    /// Build a submission from stored parts.
    #[must_use]
    pub const fn new(id: SubmissionId, payload: Payload, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            payload,
            created_at,
            kind: PhantomData,
        }
    }

    /// Value of a submitted field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.payload.get(name).map(String::as_str)
    }
}

// Manual impls: derives would needlessly require `K: Clone` / `K: Debug`.
impl<K> Clone for Submission<K> {
    fn clone(&self) -> Self {
        Self::new(self.id, self.payload.clone(), self.created_at)
    }
}

impl<K: SubmissionKind> fmt::Debug for Submission<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("kind", &K::KIND)
            .field("id", &self.id)
            .field("payload", &self.payload)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl<K> PartialEq for Submission<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.payload == other.payload && self.created_at == other.created_at
    }
}

/// Check a raw payload against the field rules for `K`.
fn validate_payload<K: SubmissionKind>(payload: Payload) -> Result<Payload, ValidationError> {
    for field in K::REQUIRED {
        if payload.get(*field).is_none_or(|v| v.trim().is_empty()) {
            return Err(ValidationError::new(
                "payload",
                format!("Missing required field: {field}"),
            ));
        }
    }
    if payload.len() > MAX_FIELDS {
        return Err(ValidationError::new("payload", "Too many fields submitted"));
    }
    if payload.values().any(|v| v.chars().count() > MAX_VALUE_CHARS) {
        return Err(ValidationError::new(
            "payload",
            format!("Fields are limited to {MAX_VALUE_CHARS} characters"),
        ));
    }
    Ok(payload)
}

impl<K: SubmissionKind> Record for Submission<K> {
    type Id = SubmissionId;
    type Draft = Payload;
    type Form = Payload;

    const SINGULAR: &'static str = K::SINGULAR;
    const PLURAL: &'static str = K::PLURAL;

    fn validate(form: Payload) -> Result<Payload, ValidationError> {
        validate_payload::<K>(form)
    }

    fn id(&self) -> SubmissionId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assemble(id: SubmissionId, draft: Payload, created_at: DateTime<Utc>) -> Self {
        Self::new(id, draft, created_at)
    }

    fn apply(&mut self, draft: Payload, _now: DateTime<Utc>) {
        self.payload = draft;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload(pairs: &[(&str, &str)]) -> Payload {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_feedback_requires_message() {
        assert!(Feedback::validate(payload(&[("message", "Great shop")])).is_ok());
        let err = Feedback::validate(payload(&[("rating", "5")])).unwrap_err();
        assert_eq!(err.message, "Missing required field: message");
        assert!(Feedback::validate(payload(&[("message", "   ")])).is_err());
    }

    #[test]
    fn test_extra_fields_kept() {
        let stored = Feedback::validate(payload(&[("message", "Hi"), ("rating", "4")])).unwrap();
        assert_eq!(stored.get("rating").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_contact_requires_name_email_message() {
        let err = Contact::validate(payload(&[("name", "Ada"), ("message", "Hello")])).unwrap_err();
        assert_eq!(err.message, "Missing required field: email");
        assert!(
            Contact::validate(payload(&[
                ("name", "Ada"),
                ("email", "ada@example.com"),
                ("message", "Hello"),
            ]))
            .is_ok()
        );
    }

    #[test]
    fn test_oversized_value_rejected() {
        let long = "x".repeat(MAX_VALUE_CHARS + 1);
        assert!(Feedback::validate(payload(&[("message", &long)])).is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(<Feedback as Record>::PLURAL, "feedback");
        assert_eq!(<Contact as Record>::PLURAL, "contact messages");
    }
}
