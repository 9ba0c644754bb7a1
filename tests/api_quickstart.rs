//! Independent end-to-end API tests
//!
//! Serves the real router on an ephemeral port and drives it over HTTP, so
//! routing, extractors, status mapping and the transfer coordinator are all
//! exercised together.

use std::sync::Arc;

use serde_json::{Value, json};

use skyroute::gateway::{AppState, build_router};
use skyroute::store::{DocumentStore, MemoryStore};
use skyroute::transfer::{RetryPolicy, TransferCoordinator};

/// Boot a fully wired server with the demo dataset and return its base URL.
async fn spawn_server() -> String {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    skyroute::seed::seed_demo_data(store.as_ref()).await.unwrap();

    let coordinator = Arc::new(TransferCoordinator::new(
        store.clone(),
        RetryPolicy::default(),
    ));
    let state = Arc::new(AppState::new(store, coordinator));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Register a profile and return its pid.
async fn create_profile(client: &reqwest::Client, base: &str, email: &str, balance: &str) -> String {
    let resp = client
        .post(format!("{base}/api/v1/profile"))
        .json(&json!({
            "firstName": "Test",
            "lastName": "Traveler",
            "email": email,
            "password": "hashed-secret",
            "balance": balance,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    body["data"]["pid"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn qa_health_check() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/v1/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 0);
    assert!(body["data"]["timestamp_ms"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn qa_airline_crud_lifecycle() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let url = format!("{base}/api/v1/airline/airline_test_1");

    let airline = json!({
        "name": "Test Airways",
        "callsign": "TESTAIR",
        "iata": "T1",
        "icao": "TST",
        "country": "United States",
    });

    // Create
    let resp = client.post(&url).json(&airline).send().await.unwrap();
    assert_eq!(resp.status(), 201);

    // Duplicate create conflicts
    let resp = client.post(&url).json(&airline).send().await.unwrap();
    assert_eq!(resp.status(), 409);

    // Read
    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Test Airways");

    // Update
    let updated = json!({
        "name": "Test Airways Intl",
        "callsign": "TESTAIR",
        "iata": "T1",
        "icao": "TST",
        "country": "United States",
    });
    let resp = client.put(&url).json(&updated).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    // Delete, then the document is gone
    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn qa_airline_missing_returns_404() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/v1/airline/airline_ghost"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn qa_airline_list_filters_by_country() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/v1/airline/list?country=France"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Air France"]);

    // Unknown country yields an empty result → 404
    let resp = client
        .get(format!("{base}/api/v1/airline/list?country=Narnia"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn qa_airlines_to_airport_join() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/v1/airline/to-airport?airport=CDG"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Air France", "British Airways"]);
}

#[tokio::test]
async fn qa_airport_direct_connections() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!(
            "{base}/api/v1/airport/direct-connections?airport=SFO"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let destinations: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(destinations, vec!["CDG", "JFK"]);
}

#[tokio::test]
async fn qa_profile_lifecycle() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let pid = create_profile(&client, &base, "grace@example.com", "100.00").await;
    let url = format!("{base}/api/v1/profile/{pid}");

    // Read back; the password never appears in a response
    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["email"], "grace@example.com");
    assert_eq!(body["data"]["balance"], "100.00");
    assert!(body["data"].get("password").is_none());

    // Search by first-name substring
    let resp = client
        .get(format!("{base}/api/v1/profile/list?search=tes"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Update fields; balance must survive the edit
    let resp = client
        .put(&url)
        .json(&json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "password": "rehashed-secret",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["firstName"], "Grace");
    assert_eq!(body["data"]["balance"], "100.00");

    // Delete
    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn qa_profile_duplicate_email_conflicts() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    create_profile(&client, &base, "dup@example.com", "0.00").await;

    let resp = client
        .post(format!("{base}/api/v1/profile"))
        .json(&json!({
            "firstName": "Other",
            "lastName": "Person",
            "email": "dup@example.com",
            "password": "hashed-secret",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn qa_profile_invalid_email_rejected() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/v1/profile"))
        .json(&json!({
            "firstName": "Bad",
            "lastName": "Email",
            "email": "not-an-email",
            "password": "hashed-secret",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

// ============================================================================
// Transfer endpoint
// ============================================================================

#[tokio::test]
async fn qa_transfer_happy_path() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let src = create_profile(&client, &base, "src@example.com", "500.00").await;
    let dst = create_profile(&client, &base, "dst@example.com", "200.00").await;

    let resp = client
        .post(format!("{base}/api/v1/profile/transfer"))
        .json(&json!({"from": src, "to": dst, "amount": "50.00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["source_balance"], "450.00");
    assert_eq!(body["data"]["dest_balance"], "250.00");

    // The stored documents agree with the response
    let resp = client
        .get(format!("{base}/api/v1/profile/{src}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["balance"], "450.00");

    let resp = client
        .get(format!("{base}/api/v1/profile/{dst}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["balance"], "250.00");
}

#[tokio::test]
async fn qa_transfer_insufficient_funds() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let src = create_profile(&client, &base, "poor@example.com", "30.00").await;
    let dst = create_profile(&client, &base, "rich@example.com", "0.00").await;

    let resp = client
        .post(format!("{base}/api/v1/profile/transfer"))
        .json(&json!({"from": src, "to": dst, "amount": "50.00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);

    // No partial mutation
    let resp = client
        .get(format!("{base}/api/v1/profile/{src}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["balance"], "30.00");
}

#[tokio::test]
async fn qa_transfer_missing_destination() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let src = create_profile(&client, &base, "alone@example.com", "500.00").await;
    let ghost = uuid::Uuid::new_v4();

    let resp = client
        .post(format!("{base}/api/v1/profile/transfer"))
        .json(&json!({"from": src, "to": ghost, "amount": "50.00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .get(format!("{base}/api/v1/profile/{src}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["balance"], "500.00");
}

#[tokio::test]
async fn qa_transfer_rejects_self_transfer() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let pid = create_profile(&client, &base, "self@example.com", "500.00").await;

    let resp = client
        .post(format!("{base}/api/v1/profile/transfer"))
        .json(&json!({"from": pid, "to": pid, "amount": "50.00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn qa_transfer_rejects_malformed_amounts() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let src = create_profile(&client, &base, "fmt1@example.com", "500.00").await;
    let dst = create_profile(&client, &base, "fmt2@example.com", "0.00").await;

    // JSON number instead of string, negative, and excess precision are all
    // rejected before the coordinator runs
    for amount in [json!(50.0), json!("-50.00"), json!("50.001"), json!(".5")] {
        let resp = client
            .post(format!("{base}/api/v1/profile/transfer"))
            .json(&json!({"from": src, "to": dst, "amount": amount}))
            .send()
            .await
            .unwrap();
        assert!(
            resp.status().is_client_error(),
            "amount {amount} was not rejected"
        );
    }

    // Balances untouched
    let resp = client
        .get(format!("{base}/api/v1/profile/{src}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["balance"], "500.00");
}

#[tokio::test]
async fn qa_transfer_idempotent_replay_over_http() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let src = create_profile(&client, &base, "idem1@example.com", "500.00").await;
    let dst = create_profile(&client, &base, "idem2@example.com", "200.00").await;

    let request = json!({"from": src, "to": dst, "amount": "50.00", "cid": "order-42"});

    let first: Value = client
        .post(format!("{base}/api/v1/profile/transfer"))
        .json(&request)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let second: Value = client
        .post(format!("{base}/api/v1/profile/transfer"))
        .json(&request)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first["data"]["transfer_id"], second["data"]["transfer_id"]);
    assert_eq!(second["data"]["source_balance"], "450.00");

    // Applied exactly once
    let resp = client
        .get(format!("{base}/api/v1/profile/{src}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["balance"], "450.00");
}
