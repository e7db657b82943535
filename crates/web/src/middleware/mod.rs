//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, memory or `PostgreSQL` store)
//!
//! Authentication is not a layer: protected handlers take a [`RequireAuth`]
//! extractor, which runs before the handler body for every method.

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
