//! Authentication route handlers.
//!
//! Handles signup, login and logout. Failures redirect back to the form with
//! the reason in `?error=`; success lands on `/index`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{MessageQuery, redirect_with};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::{AuthError, NewAccount};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form data.
#[derive(Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword", alias = "confirm_password")]
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user_name: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub user_name: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Send visitors to the right starting page.
pub async fn root(OptionalAuth(user): OptionalAuth) -> Redirect {
    if user.is_some() {
        Redirect::to("/index")
    } else {
        Redirect::to("/login")
    }
}

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/index").into_response();
    }
    LoginTemplate {
        user_name: None,
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Redirect {
    match state.auth().login(&form.email, &form.password).await {
        Ok(user) => establish_session(&session, &user, "/login").await,
        Err(e) => {
            report_auth_failure(&e);
            redirect_with("/login", "error", &e.user_message())
        }
    }
}

/// Display the signup page.
pub async fn signup_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/index").into_response();
    }
    SignupTemplate {
        user_name: None,
        error: query.error,
    }
    .into_response()
}

/// Handle signup form submission.
///
/// A successful signup logs the new user straight in.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Redirect {
    let account = NewAccount {
        name: &form.name,
        email: &form.email,
        password: &form.password,
        confirm_password: &form.confirm_password,
    };
    match state.auth().signup(account).await {
        Ok(user) => establish_session(&session, &user, "/signup").await,
        Err(e) => {
            report_auth_failure(&e);
            redirect_with("/signup", "error", &e.user_message())
        }
    }
}

/// Destroy the session and return to the login page.
///
/// Safe to hit repeatedly or without a session.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to destroy session: {}", e);
    }
    clear_sentry_user();
    Redirect::to("/login")
}

// =============================================================================
// Helpers
// =============================================================================

/// Store `user` in the session and continue to `/index`, or send the user
/// back to `form_path` if the session store fails.
async fn establish_session(session: &Session, user: &User, form_path: &str) -> Redirect {
    if let Err(e) = set_current_user(session, &CurrentUser::from(user)).await {
        tracing::error!("Failed to set session: {}", e);
        return redirect_with(form_path, "error", "Could not start your session. Please try again.");
    }
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");
    Redirect::to("/index")
}

fn report_auth_failure(err: &AuthError) {
    if err.is_server_error() {
        let event_id = sentry::capture_error(err);
        tracing::error!(error = %err, sentry_event_id = %event_id, "auth failed");
    } else {
        tracing::warn!(reason = %err, "auth rejected");
    }
}
