// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use nutritrack_api::config::Config;
use nutritrack_api::db::ProfileStore;
use nutritrack_api::routes::create_router;
use nutritrack_api::services::{NutritionClient, ProfileService};
use nutritrack_api::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test app over the given config and an in-memory store.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let nutrition = NutritionClient::new(&config).expect("HTTP client should build");
    let state = Arc::new(AppState {
        config,
        profiles: ProfileService::new(ProfileStore::in_memory()),
        nutrition,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with offline defaults.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A complete, valid create payload.
#[allow(dead_code)]
pub fn profile_payload(external_id: &str, email: &str) -> Value {
    serde_json::json!({
        "externalId": external_id,
        "email": email,
        "name": "Test User",
        "authProvider": "email",
        "gender": "female",
        "age": 30,
        "height": 168.0,
        "heightImperial": { "feet": 5.0, "inches": 6.0 },
        "currentWeight": 70.0,
        "goalWeight": 65.0,
        "goalType": "lose",
        "weightDifference": 5.0,
        "weightChangeSpeed": 0.5
    })
}
