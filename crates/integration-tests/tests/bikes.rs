//! Integration tests for bike inventory management.

use bikeshop_integration_tests::{TestApp, assert_redirect};
use bikeshop_web::db::RecordStore;
use reqwest::StatusCode;

async fn bike_count(app: &TestApp) -> usize {
    app.state
        .stores()
        .bikes
        .list_newest_first()
        .await
        .expect("list bikes")
        .len()
}

async fn add_bike(app: &TestApp, model: &str, price: &str, quantity: &str) -> reqwest::Response {
    app.post_form(
        "/bikes/add",
        &[
            ("model", model),
            ("brand", "Acme"),
            ("price", price),
            ("quantity", quantity),
        ],
    )
    .await
}

#[tokio::test]
async fn test_anonymous_add_is_rejected_and_not_persisted() {
    let app = TestApp::spawn().await;
    let response = add_bike(&app, "Model X", "1000", "5").await;
    assert_redirect(&response, "/login");
    assert_eq!(bike_count(&app).await, 0);
}

#[tokio::test]
async fn test_added_bike_is_listed_first() {
    let app = TestApp::spawn().await;
    app.signup_and_login("stock@example.com").await;

    add_bike(&app, "Older Tourer", "450", "2").await;
    let response = add_bike(&app, "Model X", "1000", "5").await;
    assert_redirect(&response, "/bikes?success=Bike%20added%20successfully");

    let page = app.get("/bikes").await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = page.text().await.expect("body");
    let newest = body.find("Model X").expect("new bike listed");
    let older = body.find("Older Tourer").expect("old bike listed");
    assert!(newest < older);
    assert!(body.contains("$1000.00"));
}

#[tokio::test]
async fn test_invalid_bikes_are_not_persisted() {
    let app = TestApp::spawn().await;
    app.signup_and_login("stock@example.com").await;

    let response = add_bike(&app, "Model X", "-1", "5").await;
    assert_redirect(&response, "/bikes?error=Price%20cannot%20be%20negative");

    let response = add_bike(&app, "Model X", "1000", "-5").await;
    assert_redirect(&response, "/bikes?error=Quantity%20cannot%20be%20negative");

    let response = add_bike(&app, "X", "1000", "5").await;
    assert_redirect(
        &response,
        "/bikes?error=Model%20name%20must%20be%20at%20least%202%20characters",
    );

    assert_eq!(bike_count(&app).await, 0);
}

#[tokio::test]
async fn test_blank_quantity_defaults_to_zero() {
    let app = TestApp::spawn().await;
    app.signup_and_login("stock@example.com").await;

    add_bike(&app, "Model X", "0", "").await;
    let bikes = app
        .state
        .stores()
        .bikes
        .list_newest_first()
        .await
        .expect("list bikes");
    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes.first().map(|b| b.quantity), Some(0));
}

#[tokio::test]
async fn test_update_bike() {
    let app = TestApp::spawn().await;
    app.signup_and_login("stock@example.com").await;
    add_bike(&app, "Model X", "1000", "5").await;
    let id = app.state.stores().bikes.list_newest_first().await.expect("list")[0].id;

    let response = app
        .post_form(
            &format!("/bikes/update/{id}"),
            &[
                ("model", "Model Y"),
                ("brand", "Acme"),
                ("price", "1200"),
                ("quantity", "3"),
            ],
        )
        .await;
    assert_redirect(&response, "/bikes?success=Bike%20updated%20successfully");

    let bike = app
        .state
        .stores()
        .bikes
        .get(id)
        .await
        .expect("get")
        .expect("bike still exists");
    assert_eq!(bike.model, "Model Y");
    assert_eq!(bike.quantity, 3);
}

#[tokio::test]
async fn test_update_missing_bike_is_not_found() {
    let app = TestApp::spawn().await;
    app.signup_and_login("stock@example.com").await;
    add_bike(&app, "Model X", "1000", "5").await;

    for path in ["/bikes/update/999", "/bikes/update/not-an-id"] {
        let response = app
            .post_form(
                path,
                &[
                    ("model", "Ghost"),
                    ("brand", "Acme"),
                    ("price", "1"),
                    ("quantity", "1"),
                ],
            )
            .await;
        assert_redirect(&response, "/bikes?error=Bike%20not%20found");
    }

    let bikes = app.state.stores().bikes.list_newest_first().await.expect("list");
    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes[0].model, "Model X");
}

#[tokio::test]
async fn test_delete_bike() {
    let app = TestApp::spawn().await;
    app.signup_and_login("stock@example.com").await;
    add_bike(&app, "Model X", "1000", "5").await;
    let id = app.state.stores().bikes.list_newest_first().await.expect("list")[0].id;

    let response = app.post_form(&format!("/bikes/delete/{id}"), &[]).await;
    assert_redirect(&response, "/bikes?success=Bike%20deleted%20successfully");
    assert_eq!(bike_count(&app).await, 0);

    let response = app.post_form(&format!("/bikes/delete/{id}"), &[]).await;
    assert_redirect(&response, "/bikes?error=Bike%20not%20found");
}
