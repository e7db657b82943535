//! Bike Shop Core - Shared domain types.
//!
//! This crate provides the validated value types used by every bike shop
//! component:
//! - `web` - The session-authenticated web application
//! - `cli` - Migrations and user provisioning
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database codecs are available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
