//! Core types for the bike shop.
//!
//! Each type validates on construction so that downstream code can rely on
//! the invariant without re-checking it.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
