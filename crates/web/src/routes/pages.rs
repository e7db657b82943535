//! Signed-in content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use super::{MessageQuery, format_date};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Submission;
use crate::state::AppState;

/// How many recent submissions of each kind the dashboard shows.
const RECENT_LIMIT: usize = 5;

// =============================================================================
// Templates
// =============================================================================

/// Submission row for display.
#[derive(Debug, Clone)]
pub struct SubmissionView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub received: String,
}

impl<K> From<&Submission<K>> for SubmissionView {
    fn from(submission: &Submission<K>) -> Self {
        let field = |name: &str| submission.field(name).unwrap_or_default().to_owned();
        Self {
            id: submission.id.as_i32(),
            name: field("name"),
            email: field("email"),
            message: field("message"),
            received: format_date(submission.created_at),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub user_name: Option<String>,
    pub bike_count: usize,
    pub buyer_count: usize,
    pub feedback: Vec<SubmissionView>,
    pub contacts: Vec<SubmissionView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub user_name: Option<String>,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub user_name: Option<String>,
}

/// Help page template (includes the contact form).
#[derive(Template, WebTemplate)]
#[template(path = "pages/help.html")]
pub struct HelpTemplate {
    pub user_name: Option<String>,
}

/// Feedback page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/feedback.html")]
pub struct FeedbackTemplate {
    pub user_name: Option<String>,
}

/// Services page template (includes the buyer interest form).
#[derive(Template, WebTemplate)]
#[template(path = "pages/services.html")]
pub struct ServicesTemplate {
    pub user_name: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Dashboard: record counts and the latest visitor submissions.
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let bikes = state.bikes().list().await;
    let buyers = state.buyers().list().await;
    let feedback = state.feedback().list().await;
    let contacts = state.contacts().list().await;

    let error = query
        .error
        .or(bikes.error)
        .or(buyers.error)
        .or(feedback.error)
        .or(contacts.error);

    DashboardTemplate {
        user_name: Some(user.name),
        bike_count: bikes.records.len(),
        buyer_count: buyers.records.len(),
        feedback: feedback
            .records
            .iter()
            .take(RECENT_LIMIT)
            .map(SubmissionView::from)
            .collect(),
        contacts: contacts
            .records
            .iter()
            .take(RECENT_LIMIT)
            .map(SubmissionView::from)
            .collect(),
        error,
        success: query.success,
    }
}

/// Home page.
pub async fn index(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    IndexTemplate {
        user_name: Some(user.name),
    }
}

/// About page.
pub async fn about(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    AboutTemplate {
        user_name: Some(user.name),
    }
}

/// Help page.
pub async fn help(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    HelpTemplate {
        user_name: Some(user.name),
    }
}

/// Feedback page.
pub async fn feedback(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    FeedbackTemplate {
        user_name: Some(user.name),
    }
}

/// Services page.
pub async fn services(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    ServicesTemplate {
        user_name: Some(user.name),
    }
}
