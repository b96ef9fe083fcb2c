//! API integration tests
//!
//! Run against a live server with a seeded database:
//! `cargo test --test api_tests -- --ignored`
//!
//! Environment: `JWT_SECRET`, `TEST_BARBER_ID`, `TEST_CUSTOMER_ID`,
//! `TEST_SERVICE_NAME`, `TEST_DISCOUNT` (a discount with a per-client cap of 1
//! that the test customer has not used yet).

use barbershop_server::models::{UserClaims, UserRole};
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Mint a token for a user that exists in the seeded database
fn token_for(user_id: Uuid, role: UserRole) -> String {
    let now = Utc::now().timestamp();
    UserClaims {
        sub: format!("{}@test", user_id),
        user_id,
        role,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&env_or("JWT_SECRET", "change-this-secret-in-production"))
    .expect("Failed to create token")
}

fn customer_token() -> String {
    let customer_id = env_or("TEST_CUSTOMER_ID", &Uuid::nil().to_string());
    token_for(customer_id.parse().expect("Invalid TEST_CUSTOMER_ID"), UserRole::Customer)
}

fn barber_id() -> String {
    std::env::var("TEST_BARBER_ID").expect("TEST_BARBER_ID must be set")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_availability_past_date() {
    let client = Client::new();
    let yesterday = (Utc::now() - Duration::days(1)).date_naive();

    let response = client
        .get(format!(
            "{}/haircuts/barbers/{}/availability?date={}",
            BASE_URL,
            barber_id(),
            yesterday
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_availability_slots_are_hhmm() {
    let client = Client::new();
    let date = (Utc::now() + Duration::days(7)).date_naive();

    let response = client
        .get(format!(
            "{}/haircuts/barbers/{}/availability?date={}&service_duration=45",
            BASE_URL,
            barber_id(),
            date
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["service_duration"], 45);
    for slot in body["available_slots"].as_array().expect("slots array") {
        let slot = slot.as_str().expect("slot string");
        assert_eq!(slot.len(), 5);
        assert_eq!(&slot[2..3], ":");
    }
}

#[tokio::test]
#[ignore]
async fn test_concurrent_identical_bookings() {
    let client = Client::new();
    let token = customer_token();

    // Random minute far in the future so reruns do not collide
    let offset = Duration::days(400) + Duration::minutes((Uuid::new_v4().as_u128() % 100_000) as i64);
    let begin = Utc::now() + offset;
    let end = begin + Duration::minutes(30);
    let body = json!({
        "begin_date_time": begin,
        "end_date_time": end,
        "barber_id": barber_id(),
        "service_name": env_or("TEST_SERVICE_NAME", "Haircut"),
    });

    let send = || {
        client
            .post(format!("{}/haircuts/events", BASE_URL))
            .bearer_auth(&token)
            .json(&body)
            .send()
    };

    let (first, second) = tokio::join!(send(), send());
    let mut statuses = vec![
        first.expect("Failed to send request").status(),
        second.expect("Failed to send request").status(),
    ];
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
#[ignore]
async fn test_inverted_booking_interval() {
    let client = Client::new();
    let begin = Utc::now() + Duration::days(30);

    let response = client
        .post(format!("{}/haircuts/events", BASE_URL))
        .bearer_auth(customer_token())
        .json(&json!({
            "begin_date_time": begin,
            "end_date_time": begin - Duration::minutes(30),
            "barber_id": barber_id(),
            "service_name": env_or("TEST_SERVICE_NAME", "Haircut"),
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_discount_usage_cap() {
    let client = Client::new();
    let token = customer_token();
    let name = env_or("TEST_DISCOUNT", "SAVE10");

    let apply = || {
        client
            .post(format!("{}/discounts/apply", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({ "name": name }))
            .send()
    };

    let first = apply().await.expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::OK);

    let second = apply().await.expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::FORBIDDEN);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "discount usage limit reached");
}

#[tokio::test]
#[ignore]
async fn test_unknown_discount() {
    let client = Client::new();

    let response = client
        .post(format!("{}/discounts/apply", BASE_URL))
        .bearer_auth(customer_token())
        .json(&json!({ "name": format!("NOPE-{}", Uuid::new_v4()) }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
