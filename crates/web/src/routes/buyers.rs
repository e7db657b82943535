//! Buyer lead route handlers.
//!
//! Leads come in through the public interest form (`/submit-form`) and are
//! managed from `/buyers`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use super::{MessageQuery, format_date, record_error_redirect, redirect_with};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Buyer, BuyerForm};
use crate::state::AppState;

const BUYERS_PATH: &str = "/buyers";

// =============================================================================
// Templates
// =============================================================================

/// Buyer row for display.
#[derive(Debug, Clone)]
pub struct BuyerView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interested_bike: String,
    pub added: String,
}

impl From<&Buyer> for BuyerView {
    fn from(buyer: &Buyer) -> Self {
        Self {
            id: buyer.id.as_i32(),
            name: buyer.name.clone(),
            email: buyer.email.to_string(),
            phone: buyer.phone.clone(),
            interested_bike: buyer.interested_bike.clone(),
            added: format_date(buyer.created_at),
        }
    }
}

/// Buyer leads page template.
#[derive(Template, WebTemplate)]
#[template(path = "records/buyers.html")]
pub struct BuyersTemplate {
    pub user_name: Option<String>,
    pub buyers: Vec<BuyerView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List buyer leads, newest first.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let listing = state.buyers().list().await;

    BuyersTemplate {
        user_name: Some(user.name),
        buyers: listing.records.iter().map(BuyerView::from).collect(),
        error: query.error.or(listing.error),
        success: query.success,
    }
}

/// Record interest in a bike.
#[instrument(skip_all)]
pub async fn submit_interest(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<BuyerForm>,
) -> Result<(StatusCode, &'static str)> {
    state.buyers().create(form).await?;
    Ok((StatusCode::OK, "Your interest has been submitted!"))
}

/// Update a buyer lead.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<BuyerForm>,
) -> Redirect {
    match state.buyers().update(&id, form).await {
        Ok(_) => redirect_with(BUYERS_PATH, "success", "Buyer updated successfully"),
        Err(e) => record_error_redirect::<Buyer>(BUYERS_PATH, "update", &e),
    }
}

/// Delete a buyer lead.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Redirect {
    match state.buyers().delete(&id).await {
        Ok(()) => redirect_with(BUYERS_PATH, "success", "Buyer deleted successfully"),
        Err(e) => record_error_redirect::<Buyer>(BUYERS_PATH, "delete", &e),
    }
}
