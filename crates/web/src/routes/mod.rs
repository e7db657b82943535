//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          -> /index or /login
//! GET  /login, /signup            Auth forms (POST to submit)
//! GET  /logout                    Destroy session
//! GET  /dashboard, /about, /help, /feedback, /services, /index
//! POST /submit-feedback           Feedback (plain-text answer)
//! POST /contact-us, /submit-contact
//! POST /submit-form               Buyer interest (plain-text answer)
//! GET  /bikes                     Inventory page
//! POST /bikes/add, /bikes/update/{id}, /bikes/delete/{id}
//! GET  /buyers                    Buyer leads page
//! POST /buyers/update/{id}, /buyers/delete/{id}
//! POST /feedback/delete/{id}, /contact-us/delete/{id}
//! GET  /health, /health/ready
//! ```
//!
//! Everything except the auth forms and health checks requires a session.

pub mod auth;
pub mod bikes;
pub mod buyers;
pub mod pages;
pub mod submissions;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::Record;
use crate::services::RecordError;
use crate::state::AppState;

// =============================================================================
// Shared Types
// =============================================================================

/// Query parameters for error/success banners.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Build a redirect to `path` carrying a `?key=message` banner.
pub(crate) fn redirect_with(path: &str, key: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?{key}={}", urlencoding::encode(message)))
}

/// Format a timestamp for display (e.g., "March 4, 2026").
pub(crate) fn format_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Redirect back to `path` after a failed record operation.
///
/// Validation and not-found messages are shown as-is; store failures are
/// logged and reported, and the user only sees a generic message.
pub(crate) fn record_error_redirect<R: Record>(
    path: &str,
    action: &str,
    err: &RecordError,
) -> Redirect {
    let message = match err {
        RecordError::Store(e) => {
            let event_id = sentry::capture_error(e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "failed to {action} {}",
                R::SINGULAR
            );
            format!("Failed to {action} {}", R::SINGULAR.to_lowercase())
        }
        other => other.to_string(),
    };
    redirect_with(path, "error", &message)
}

// =============================================================================
// Router
// =============================================================================

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::root))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout))
}

/// Create the static page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/about", get(pages::about))
        .route("/help", get(pages::help))
        .route("/feedback", get(pages::feedback))
        .route("/services", get(pages::services))
        .route("/index", get(pages::index))
}

/// Create the bike routes router.
pub fn bike_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bikes::index))
        .route("/add", post(bikes::create))
        .route("/update/{id}", post(bikes::update))
        .route("/delete/{id}", post(bikes::delete))
}

/// Create the buyer routes router.
pub fn buyer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(buyers::index))
        .route("/update/{id}", post(buyers::update))
        .route("/delete/{id}", post(buyers::delete))
}

/// Create the visitor submission routes router.
pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/submit-feedback", post(submissions::submit_feedback))
        .route("/contact-us", post(submissions::submit_contact))
        .route("/submit-contact", post(submissions::submit_contact))
        .route("/submit-form", post(buyers::submit_interest))
        .route("/feedback/delete/{id}", post(submissions::delete_feedback))
        .route("/contact-us/delete/{id}", post(submissions::delete_contact))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(auth_routes())
        .merge(page_routes())
        .merge(submission_routes())
        .nest("/bikes", bike_routes())
        .nest("/buyers", buyer_routes())
}

// =============================================================================
// Health & Fallback
// =============================================================================

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity when a database is configured.
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/404.html")]
pub struct NotFoundTemplate {
    pub user_name: Option<String>,
}

/// Fallback for unknown paths.
pub async fn not_found(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            user_name: user.map(|u| u.name),
        },
    )
}
