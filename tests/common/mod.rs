#![allow(dead_code)]

use axum::{Router, routing::get};
use axum_test::TestServer;
use housing_ledger::api::handlers::health_handler;
use housing_ledger::api::routes::api_routes;
use housing_ledger::state::AppState;
use serde_json::{Value, json};

pub const MAX_ATTEMPTS: usize = 5;

pub fn create_test_state() -> AppState {
    AppState::in_memory(MAX_ATTEMPTS)
}

pub fn create_test_server() -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .with_state(create_test_state());

    TestServer::new(app).unwrap()
}

pub fn account_body(address: &str, area: i32) -> Value {
    json!({
        "startDate": "2024-01-01T00:00:00Z",
        "endDate": "2025-01-01T00:00:00Z",
        "address": address,
        "area": area
    })
}

pub fn resident_body(account_id: &str, first: &str, last: &str) -> Value {
    json!({
        "firstName": first,
        "lastName": last,
        "birthDate": "1990-05-17",
        "accountId": account_id
    })
}

/// Creates an account and returns its JSON representation.
pub async fn create_account(server: &TestServer, address: &str, area: i32) -> Value {
    let response = server
        .post("/api/account")
        .json(&account_body(address, area))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Creates a resident and returns its JSON representation.
pub async fn create_resident(server: &TestServer, account_id: &str, first: &str, last: &str) -> Value {
    let response = server
        .post("/api/resident")
        .json(&resident_body(account_id, first, last))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}
