//! API integration tests
//!
//! Need a running server with a migrated database. Authenticated calls use
//! `TEST_ACCESS_TOKEN`, a token issued by the identity provider.

use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn access_token() -> Option<String> {
    std::env::var("TEST_ACCESS_TOKEN").ok()
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

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_list_services() {
    let client = Client::new();

    let response = client
        .get(format!("{}/services", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let services = body.as_array().expect("Expected an array");
    assert!(!services.is_empty());
    assert!(services[0]["duration_minutes"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_month_availability_has_full_grid() {
    let client = Client::new();

    let response = client
        .get(format!("{}/availability/days?month=2026-10&duration=30", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let days = body["days"].as_array().expect("Expected days");
    assert_eq!(days.len() % 7, 0);
    assert_eq!(body["window"]["duration_minutes"], 30);

    // Sundays are closed in the default configuration
    let sunday = days
        .iter()
        .find(|d| d["day"] == "2026-10-25")
        .expect("Sunday in grid");
    assert_eq!(sunday["is_bookable"], false);
}

#[tokio::test]
#[ignore]
async fn test_day_slots_are_grouped() {
    let client = Client::new();

    let response = client
        .get(format!("{}/availability/slots?date=2030-01-08&duration=60", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["slots"]["morning"].is_array());
    assert!(body["slots"]["afternoon"].is_array());
    assert!(body["slots"]["evening"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_availability_rejects_bad_month() {
    let client = Client::new();

    let response = client
        .get(format!("{}/availability/days?month=2026-13&duration=30", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_booking_requires_authentication() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&serde_json::json!({
            "date": "2030-01-08",
            "time": "10:00",
            "service_ids": [1]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_my_appointments() {
    let Some(token) = access_token() else {
        return;
    };
    let client = Client::new();

    let response = client
        .get(format!("{}/me/appointments", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_double_booking_is_rejected() {
    let Some(token) = access_token() else {
        return;
    };
    let client = Client::new();
    let request = serde_json::json!({
        "date": "2030-01-08",
        "time": "16:00",
        "service_ids": [1]
    });

    let first = client
        .post(format!("{}/appointments", BASE_URL))
        .bearer_auth(&token)
        .json(&request)
        .send()
        .await
        .expect("Failed to send request");
    // A previous run may already hold the slot
    assert!(first.status() == 201 || first.status() == 409);

    let second = client
        .post(format!("{}/appointments", BASE_URL))
        .bearer_auth(&token)
        .json(&request)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 409);

    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "SlotUnavailable");
}
