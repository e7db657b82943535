//! Feedback and contact form handlers.
//!
//! Submissions answer with plain text so the forms can post them from
//! script; the dashboard lists them and can delete them.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use tracing::instrument;

use super::{record_error_redirect, redirect_with};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Contact, Feedback, Payload};
use crate::state::AppState;

const DASHBOARD_PATH: &str = "/dashboard";

/// Store site feedback.
#[instrument(skip_all)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(payload): Form<Payload>,
) -> Result<(StatusCode, &'static str)> {
    state.feedback().create(payload).await?;
    Ok((StatusCode::OK, "Feedback received!"))
}

/// Store a contact-form message.
#[instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(payload): Form<Payload>,
) -> Result<(StatusCode, &'static str)> {
    state.contacts().create(payload).await?;
    Ok((StatusCode::OK, "Message received!"))
}

/// Delete a feedback entry.
#[instrument(skip_all)]
pub async fn delete_feedback(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Redirect {
    match state.feedback().delete(&id).await {
        Ok(()) => redirect_with(DASHBOARD_PATH, "success", "Feedback deleted"),
        Err(e) => record_error_redirect::<Feedback>(DASHBOARD_PATH, "delete", &e),
    }
}

/// Delete a contact message.
#[instrument(skip_all)]
pub async fn delete_contact(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Redirect {
    match state.contacts().delete(&id).await {
        Ok(()) => redirect_with(DASHBOARD_PATH, "success", "Contact message deleted"),
        Err(e) => record_error_redirect::<Contact>(DASHBOARD_PATH, "delete", &e),
    }
}
