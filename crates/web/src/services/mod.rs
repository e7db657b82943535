//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Signup and password login
//! - `records` - Generic create/list/update/delete over any [`Record`](crate::models::Record)

pub mod auth;
pub mod records;

pub use auth::{AuthError, AuthService, NewAccount};
pub use records::{Listing, RecordError, RecordService};
