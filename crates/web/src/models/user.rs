//! User domain types.

use chrono::{DateTime, Utc};

use bikeshop_core::{Email, UserId};

/// A registered user.
///
/// The password hash is deliberately not part of this type; it only leaves
/// the credential store when a login needs to verify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name given at signup.
    pub name: String,
    /// Normalized email address (unique).
    pub email: Email,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
}
