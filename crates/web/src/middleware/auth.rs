//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring user authentication in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires user authentication.
///
/// If the user is not logged in, returns a redirect to the login page.
/// Because it is an extractor, the handler body never runs (and never reads
/// the request body) for anonymous requests.
///
/// The identity stored in the session is re-read from the user store on
/// every request. A session whose account no longer exists is destroyed and
/// treated as anonymous.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// The session or user store failed.
    Failed(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

/// Resolve the session's identity against the user store.
///
/// `Ok(None)` for anonymous sessions and for sessions whose user is gone;
/// the latter are flushed.
async fn resolve_user(
    session: &Session,
    state: &AppState,
) -> Result<Option<CurrentUser>, AppError> {
    let Some(stored) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await?
    else {
        return Ok(None);
    };

    match state.stores().users.get_by_id(stored.id).await? {
        Some(user) => Ok(Some(CurrentUser::from(&user))),
        None => {
            tracing::warn!(user_id = %stored.id, "session refers to a missing user; destroying it");
            session.flush().await?;
            Ok(None)
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let anonymous = if parts.uri.path().starts_with("/api/") {
            AuthRejection::Unauthorized
        } else {
            AuthRejection::RedirectToLogin
        };

        // Get the session from extensions (set by SessionManagerLayer)
        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(anonymous);
        };

        match resolve_user(session, state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => Err(anonymous),
            Err(e) => Err(AuthRejection::Failed(e)),
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if the user is not
/// logged in; store failures also count as anonymous.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        let user = resolve_user(session, state).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to resolve session user");
            None
        });

        Ok(Self(user))
    }
}

/// Establish `user` as the session identity.
///
/// The session id is cycled first so an id issued before login can't be
/// reused to ride the authenticated session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Destroy the whole session (logout). Safe to call without a session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
