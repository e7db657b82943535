//! Bike shop web application library.
//!
//! Signup/login with server-side sessions, and management pages for bikes,
//! buyer leads, feedback and contact messages. The binary in `main.rs` wires
//! configuration, logging and the session store around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::MemoryStore;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Build the application router, without a session layer.
///
/// Every route that reads the session needs a `SessionManagerLayer` on top;
/// see [`app_with_memory_sessions`] and the binary for the two options.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Build the application router with in-process sessions.
pub fn app_with_memory_sessions(state: AppState) -> Router {
    let session_layer = create_session_layer(MemoryStore::default(), state.config());
    app(state).layer(session_layer)
}
