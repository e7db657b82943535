//! Integration tests for signup, login, logout and route gating.

use bikeshop_core::Email;
use bikeshop_integration_tests::{TEST_PASSWORD, TestApp, assert_redirect, location};
use bikeshop_web::db::UserStore;
use reqwest::StatusCode;

// ============================================================================
// Gating
// ============================================================================

#[tokio::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let app = TestApp::spawn().await;
    assert_redirect(&app.get("/dashboard").await, "/login");
}

#[tokio::test]
async fn test_every_page_requires_a_session() {
    let app = TestApp::spawn().await;
    for path in [
        "/dashboard",
        "/about",
        "/help",
        "/feedback",
        "/services",
        "/index",
        "/bikes",
        "/buyers",
    ] {
        assert_redirect(&app.get(path).await, "/login");
    }
}

#[tokio::test]
async fn test_root_follows_session_state() {
    let app = TestApp::spawn().await;
    assert_redirect(&app.get("/").await, "/login");

    app.signup_and_login("root@example.com").await;
    assert_redirect(&app.get("/").await, "/index");
}

#[tokio::test]
async fn test_session_of_missing_user_is_destroyed() {
    let app = TestApp::spawn().await;
    app.signup_and_login("gone@example.com").await;
    assert_eq!(app.get("/dashboard").await.status(), StatusCode::OK);

    // Same session store and cookie, but a user store without the account.
    let other = app.spawn_sharing_sessions().await;
    assert_redirect(&other.get("/dashboard").await, "/login");

    // The stale session was flushed, so the first server rejects it too.
    assert_redirect(&app.get("/dashboard").await, "/login");
}

#[tokio::test]
async fn test_login_page_shown_to_session_of_missing_user() {
    let app = TestApp::spawn().await;
    app.signup_and_login("gone@example.com").await;

    let other = app.spawn_sharing_sessions().await;
    assert_eq!(other.get("/login").await.status(), StatusCode::OK);
    assert_redirect(&other.get("/").await, "/login");
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_establishes_session() {
    let app = TestApp::spawn().await;
    let response = app
        .signup("Ada", "Ada@Example.com", TEST_PASSWORD, TEST_PASSWORD)
        .await;
    assert_redirect(&response, "/index");

    let page = app.get("/index").await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = page.text().await.expect("body");
    assert!(body.contains("Ada"));

    let email = Email::parse("ada@example.com").expect("valid email");
    let stored = app.state.stores().users.get_by_email(&email).await.expect("store");
    assert_eq!(stored.map(|u| u.name).as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_signup_with_taken_email_conflicts() {
    let app = TestApp::spawn().await;
    app.signup_and_login("taken@example.com").await;

    let other = app.new_browser();
    let response = other
        .signup("Impostor", " TAKEN@example.com ", TEST_PASSWORD, TEST_PASSWORD)
        .await;
    assert_redirect(&response, "/signup?error=Email%20already%20in%20use");

    // The second browser did not get a session.
    assert_redirect(&other.get("/dashboard").await, "/login");
}

#[tokio::test]
async fn test_signup_password_mismatch() {
    let app = TestApp::spawn().await;
    let response = app
        .signup("Ada", "ada@example.com", TEST_PASSWORD, "something else")
        .await;
    assert_redirect(&response, "/signup?error=Passwords%20do%20not%20match");
    assert_redirect(&app.get("/dashboard").await, "/login");
}

#[tokio::test]
async fn test_signup_rejects_short_password_and_bad_email() {
    let app = TestApp::spawn().await;

    let response = app.signup("Ada", "ada@example.com", "short", "short").await;
    let target = location(&response).expect("redirect");
    assert!(target.starts_with("/signup?error="));

    let response = app
        .signup("Ada", "not-an-email", TEST_PASSWORD, TEST_PASSWORD)
        .await;
    assert_redirect(
        &response,
        "/signup?error=Please%20enter%20a%20valid%20email%20address",
    );
}

#[tokio::test]
async fn test_signup_page_shows_error_banner() {
    let app = TestApp::spawn().await;
    let page = app.get("/signup?error=Passwords%20do%20not%20match").await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.expect("body").contains("Passwords do not match"));
}

// ============================================================================
// Login & Logout
// ============================================================================

#[tokio::test]
async fn test_login_with_wrong_password_creates_no_session() {
    let app = TestApp::spawn().await;
    app.signup_and_login("rider@example.com").await;

    let other = app.new_browser();
    let response = other.login("rider@example.com", "wrong password").await;
    assert_redirect(&response, "/login?error=Incorrect%20password.");
    assert_redirect(&other.get("/dashboard").await, "/login");
}

#[tokio::test]
async fn test_login_with_unknown_email() {
    let app = TestApp::spawn().await;
    let response = app.login("ghost@example.com", TEST_PASSWORD).await;
    assert_redirect(&response, "/login?error=Incorrect%20email.");
}

#[tokio::test]
async fn test_login_after_signup_in_another_browser() {
    let app = TestApp::spawn().await;
    app.signup_and_login("rider@example.com").await;

    let other = app.new_browser();
    let response = other.login("RIDER@example.com", TEST_PASSWORD).await;
    assert_redirect(&response, "/index");
    assert_eq!(other.get("/dashboard").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_page_redirects_authenticated_user() {
    let app = TestApp::spawn().await;
    app.signup_and_login("rider@example.com").await;
    assert_redirect(&app.get("/login").await, "/index");
    assert_redirect(&app.get("/signup").await, "/index");
}

#[tokio::test]
async fn test_logout_destroys_session_and_is_idempotent() {
    let app = TestApp::spawn().await;
    app.signup_and_login("rider@example.com").await;
    assert_eq!(app.get("/dashboard").await.status(), StatusCode::OK);

    assert_redirect(&app.get("/logout").await, "/login");
    assert_redirect(&app.get("/dashboard").await, "/login");

    // Second logout, now without a session.
    assert_redirect(&app.get("/logout").await, "/login");
}

// ============================================================================
// Ambient Routes
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;
    let health = app.get("/health").await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await.expect("body"), "ok");

    assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let app = TestApp::spawn().await;
    let response = app.get("/no-such-page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.expect("body").contains("Page not found"));
}

#[tokio::test]
async fn test_wrong_method_renders_not_found_page() {
    let app = TestApp::spawn().await;
    app.signup_and_login("rider@example.com").await;

    for path in ["/bikes/add", "/bikes/delete/1", "/submit-feedback"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {path}");
        assert!(response.text().await.expect("body").contains("Page not found"));
    }
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let app = TestApp::spawn().await;
    assert_eq!(app.get("/static/css/main.css").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let app = TestApp::spawn().await;
    let response = app
        .signup("Ada", "cookie@example.com", TEST_PASSWORD, TEST_PASSWORD)
        .await;
    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie")
        .to_owned();

    assert!(cookie.starts_with("bikeshop_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));
}
