// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use nutritrack_api::db::StoreError;
use nutritrack_api::error::{AppError, FieldError};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, get_request, json_request, profile_payload};

#[test]
fn test_store_errors_map_to_distinct_statuses() {
    let cases = [
        (StoreError::duplicate_external_id(), StatusCode::CONFLICT),
        (StoreError::duplicate_email(), StatusCode::CONFLICT),
        (StoreError::NotFound("u1".to_string()), StatusCode::NOT_FOUND),
        (
            StoreError::Unavailable("deadline exceeded".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (store_err, status) in cases {
        assert_eq!(AppError::from(store_err).status(), status);
    }
}

#[tokio::test]
async fn test_validation_body_shape() {
    let err = AppError::Validation(vec![FieldError::new("age", "Age must be between 13 and 120")]);
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "age");
    assert_eq!(body["details"][0]["message"], "Age must be between 13 and 120");
}

#[tokio::test]
async fn test_internal_details_never_leak() {
    let response =
        AppError::StorageUnavailable("connection refused to 10.0.0.7:443".to_string())
            .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Server error");
    assert!(body.get("details").is_none());
    assert!(!body.to_string().contains("10.0.0.7"));
}

#[tokio::test]
async fn test_closed_store_fails_fast_with_server_error() {
    let (app, state) = create_test_app();
    app.clone()
        .oneshot(json_request("POST", "/api/users", &profile_payload("c1", "c1@example.com")))
        .await
        .unwrap();

    state.profiles.store().close().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/users/c1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "internal_error");

    let response = app
        .oneshot(json_request("POST", "/api/users", &profile_payload("c2", "c2@example.com")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
