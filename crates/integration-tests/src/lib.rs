//! Integration tests for the bike shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bikeshop-integration-tests
//! ```
//!
//! Each test spawns the full router on an ephemeral local port, backed by
//! in-memory stores and in-memory sessions, and talks to it over HTTP with a
//! cookie-keeping client. Redirects are not followed so tests can assert
//! where a response points.
//!
//! # Test Categories
//!
//! - `auth` - Signup, login, logout and route gating
//! - `bikes` - Bike inventory CRUD
//! - `submissions` - Feedback, contact and buyer interest forms

use std::path::PathBuf;

use reqwest::{Client, Response, StatusCode, header::LOCATION};
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

use bikeshop_web::config::WebConfig;
use bikeshop_web::middleware::create_session_layer;
use bikeshop_web::state::AppState;

/// Password used by [`TestApp::signup_and_login`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// A running application plus a client holding its session cookie.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    /// Shared state, for asserting on stores directly.
    pub state: AppState,
    sessions: MemoryStore,
}

impl TestApp {
    /// Spawn the application on `127.0.0.1` with a random port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn spawn() -> Self {
        Self::serve(MemoryStore::default(), new_client()).await
    }

    /// A second server with empty record and user stores that shares this
    /// server's session store and this client's cookies.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn_sharing_sessions(&self) -> Self {
        Self::serve(self.sessions.clone(), self.client.clone()).await
    }

    async fn serve(sessions: MemoryStore, client: Client) -> Self {
        let mut config = WebConfig::in_memory();
        config.static_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static"));
        let state = AppState::in_memory(config);
        let session_layer = create_session_layer(sessions.clone(), state.config());
        let app = bikeshop_web::app(state.clone()).layer(session_layer);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            client,
            state,
            sessions,
        }
    }

    /// A second, independent browser against the same server.
    #[must_use]
    pub fn new_browser(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: new_client(),
            state: self.state.clone(),
            sessions: self.sessions.clone(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a urlencoded form to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Submit the signup form.
    pub async fn signup(&self, name: &str, email: &str, password: &str, confirm: &str) -> Response {
        self.post_form(
            "/signup",
            &[
                ("name", name),
                ("email", email),
                ("password", password),
                ("confirmPassword", confirm),
            ],
        )
        .await
    }

    /// Submit the login form.
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Sign up a fresh user, leaving this client logged in.
    ///
    /// # Panics
    ///
    /// Panics if signup does not land on `/index`.
    pub async fn signup_and_login(&self, email: &str) -> Response {
        let response = self
            .signup("Test Rider", email, TEST_PASSWORD, TEST_PASSWORD)
            .await;
        assert_eq!(location(&response).as_deref(), Some("/index"));
        response
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a redirect, if any.
#[must_use]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Assert that `response` is a redirect to `target`.
///
/// # Panics
///
/// Panics if the status is not `303 See Other` or the target differs.
pub fn assert_redirect(response: &Response, target: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response).as_deref(), Some(target));
}
