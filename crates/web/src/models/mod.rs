//! Domain models for the web application.
//!
//! - [`user`] / [`session`] - accounts and the identity kept in the session
//! - [`record`] - the [`Record`] trait shared by every CRUD-managed type
//! - [`bike`], [`buyer`], [`submission`] - the managed record types
//! - [`validation`] - field-level validation errors

pub mod bike;
pub mod buyer;
pub mod record;
pub mod session;
pub mod submission;
pub mod user;
pub mod validation;

pub use bike::{Bike, BikeDraft, BikeForm};
pub use buyer::{Buyer, BuyerDraft, BuyerForm};
pub use record::Record;
pub use session::{CurrentUser, keys as session_keys};
pub use submission::{Contact, Feedback, Payload, Submission, SubmissionKind};
pub use user::User;
pub use validation::ValidationError;
