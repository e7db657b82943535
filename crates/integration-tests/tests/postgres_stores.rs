//! Integration tests for the `PostgreSQL` stores.
//!
//! These tests require:
//! - A running `PostgreSQL` database reachable via `BIKESHOP_DATABASE_URL`
//!   (or `DATABASE_URL`)
//! - Migrations applied (`cargo run -p bikeshop-cli -- migrate`)
//!
//! Run with: cargo test -p bikeshop-integration-tests -- --ignored

use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::SecretString;
use sqlx::PgPool;

use bikeshop_core::Email;
use bikeshop_web::db::{
    PgBikeStore, PgSubmissionStore, PgUserStore, RecordStore, RepositoryError, UserStore,
    create_pool,
};
use bikeshop_web::models::submission::{ContactKind, FeedbackKind};
use bikeshop_web::models::{Bike, BikeForm, Payload, Record};

async fn pool() -> PgPool {
    let url = std::env::var("BIKESHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("BIKESHOP_DATABASE_URL or DATABASE_URL must be set");
    create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database")
}

/// Suffix that keeps rows from separate runs apart.
fn unique() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

fn bike(model: &str, price: &str) -> <Bike as Record>::Draft {
    Bike::validate(BikeForm {
        model: model.to_owned(),
        brand: "Acme".to_owned(),
        price: price.to_owned(),
        quantity: "1".to_owned(),
    })
    .expect("valid bike")
}

fn payload(pairs: &[(&str, &str)]) -> Payload {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL with migrations applied"]
async fn test_duplicate_email_is_a_conflict() {
    let users = PgUserStore::new(pool().await);
    let email = Email::parse(&format!("dup-{}@example.com", unique())).expect("valid email");

    let user = users.create("First", &email, "hash").await.expect("create");
    let err = users
        .create("Second", &email, "hash2")
        .await
        .expect_err("duplicate email must fail");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let found = users.get_by_email(&email).await.expect("lookup");
    assert_eq!(found.map(|u| u.name).as_deref(), Some("First"));
    assert_eq!(
        users.get_password_hash(user.id).await.expect("hash").as_deref(),
        Some("hash")
    );
}

// ============================================================================
// Bikes
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL with migrations applied"]
async fn test_bikes_list_newest_first() {
    let bikes = PgBikeStore::new(pool().await);
    let run = unique();

    let older = bikes.insert(bike(&format!("Older {run}"), "100")).await.expect("insert");
    let newer = bikes.insert(bike(&format!("Newer {run}"), "200")).await.expect("insert");

    let listed = bikes.list_newest_first().await.expect("list");
    let position = |id| listed.iter().position(|b| b.id == id).expect("listed");
    assert!(position(newer.id) < position(older.id));

    assert!(bikes.delete(older.id).await.expect("delete"));
    assert!(bikes.delete(newer.id).await.expect("delete"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL with migrations applied"]
async fn test_bike_price_survives_numeric_column() {
    let bikes = PgBikeStore::new(pool().await);

    let created = bikes
        .insert(bike(&format!("Priced {}", unique()), "1234.56"))
        .await
        .expect("insert");
    let fetched = bikes.get(created.id).await.expect("get").expect("exists");
    assert_eq!(fetched.price, created.price);
    assert_eq!(fetched.price.display(), "$1234.56");

    let updated = bikes
        .update(created.id, bike("Free Bike", "0"))
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.price.display(), "$0.00");
    assert_eq!(updated.created_at, created.created_at);

    assert!(bikes.delete(created.id).await.expect("delete"));
    assert!(!bikes.delete(created.id).await.expect("delete"));
}

// ============================================================================
// Submissions
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL with migrations applied"]
async fn test_submission_kinds_are_isolated() {
    let pool = pool().await;
    let feedback = PgSubmissionStore::<FeedbackKind>::new(pool.clone());
    let contacts = PgSubmissionStore::<ContactKind>::new(pool);
    let marker = format!("contact {}", unique());

    let contact = contacts
        .insert(payload(&[
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("message", &marker),
        ]))
        .await
        .expect("insert");

    assert!(feedback.get(contact.id).await.expect("get").is_none());
    assert!(!feedback.delete(contact.id).await.expect("delete"));
    assert!(
        feedback
            .list_newest_first()
            .await
            .expect("list")
            .iter()
            .all(|f| f.field("message") != Some(marker.as_str()))
    );

    let stored = contacts.get(contact.id).await.expect("get").expect("exists");
    assert_eq!(stored.field("message"), Some(marker.as_str()));
    assert!(contacts.delete(contact.id).await.expect("delete"));
}
