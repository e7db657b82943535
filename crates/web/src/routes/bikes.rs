//! Bike inventory route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use super::{MessageQuery, format_date, record_error_redirect, redirect_with};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Bike, BikeForm};
use crate::state::AppState;

const BIKES_PATH: &str = "/bikes";

// =============================================================================
// Templates
// =============================================================================

/// Bike row for display.
#[derive(Debug, Clone)]
pub struct BikeView {
    pub id: i32,
    pub model: String,
    pub brand: String,
    /// Formatted for display (e.g., "$1000.00").
    pub price: String,
    /// Raw amount, used to prefill the edit form.
    pub price_value: String,
    pub quantity: i32,
    pub added: String,
}

impl From<&Bike> for BikeView {
    fn from(bike: &Bike) -> Self {
        Self {
            id: bike.id.as_i32(),
            model: bike.model.clone(),
            brand: bike.brand.clone(),
            price: bike.price.display(),
            price_value: bike.price.to_string(),
            quantity: bike.quantity,
            added: format_date(bike.created_at),
        }
    }
}

/// Bike inventory page template.
#[derive(Template, WebTemplate)]
#[template(path = "records/bikes.html")]
pub struct BikesTemplate {
    pub user_name: Option<String>,
    pub bikes: Vec<BikeView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List bikes, newest first.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let listing = state.bikes().list().await;

    BikesTemplate {
        user_name: Some(user.name),
        bikes: listing.records.iter().map(BikeView::from).collect(),
        error: query.error.or(listing.error),
        success: query.success,
    }
}

/// Add a bike.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<BikeForm>,
) -> Redirect {
    match state.bikes().create(form).await {
        Ok(_) => redirect_with(BIKES_PATH, "success", "Bike added successfully"),
        Err(e) => record_error_redirect::<Bike>(BIKES_PATH, "add", &e),
    }
}

/// Update a bike.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<BikeForm>,
) -> Redirect {
    match state.bikes().update(&id, form).await {
        Ok(_) => redirect_with(BIKES_PATH, "success", "Bike updated successfully"),
        Err(e) => record_error_redirect::<Bike>(BIKES_PATH, "update", &e),
    }
}

/// Delete a bike.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Redirect {
    match state.bikes().delete(&id).await {
        Ok(()) => redirect_with(BIKES_PATH, "success", "Bike deleted successfully"),
        Err(e) => record_error_redirect::<Bike>(BIKES_PATH, "delete", &e),
    }
}
