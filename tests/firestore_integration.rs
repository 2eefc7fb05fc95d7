// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it.

use futures_util::future::join_all;
use nutritrack_api::config::{Config, StoreBackend};
use nutritrack_api::db::{ProfileStore, StoreError};
use nutritrack_api::models::{AuthProvider, Gender, HeightImperial, UserProfile};
use nutritrack_api::schema::{ProfileInput, ProfilePatch};
use serde_json::json;

mod common;

/// Generate a unique external ID for test isolation.
fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

async fn test_store() -> ProfileStore {
    let config = Config {
        store_backend: StoreBackend::Firestore,
        ..Config::test_default()
    };
    ProfileStore::connect(&config)
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn test_profile(external_id: &str) -> UserProfile {
    UserProfile {
        external_id: external_id.to_string(),
        email: format!("{}@example.com", external_id),
        name: "Test User".to_string(),
        photo_url: None,
        auth_provider: AuthProvider::Google,
        gender: Some(Gender::Other),
        age: Some(28),
        height: Some(180.0),
        height_imperial: Some(HeightImperial {
            feet: 5.0,
            inches: 11.0,
        }),
        current_weight: Some(80.0),
        goal_weight: Some(75.0),
        goal_type: None,
        weight_difference: None,
        weight_change_speed: Some(0.5),
        created_at: "2024-01-15T10:00:00.000Z".to_string(),
    }
}

fn patch(value: serde_json::Value) -> ProfilePatch {
    serde_json::from_value::<ProfileInput>(value)
        .unwrap()
        .into_patch()
        .unwrap()
}

#[tokio::test]
async fn test_insert_and_get() {
    require_emulator!();

    let store = test_store().await;
    let id = unique_id("create");

    assert!(store.get(&id).await.unwrap().is_none());

    let profile = test_profile(&id);
    store.insert(&profile).await.unwrap();

    let fetched = store.get(&id).await.unwrap().expect("profile should exist");
    assert_eq!(fetched, profile);
}

#[tokio::test]
async fn test_insert_conflicts() {
    require_emulator!();

    let store = test_store().await;
    let id = unique_id("conflict");
    let profile = test_profile(&id);
    store.insert(&profile).await.unwrap();

    let mut same_id = test_profile(&id);
    same_id.email = format!("other-{}@example.com", id);
    assert!(matches!(
        store.insert(&same_id).await,
        Err(StoreError::Conflict(_))
    ));

    let mut same_email = test_profile(&unique_id("conflict-email"));
    same_email.email = profile.email.clone();
    assert!(matches!(
        store.insert(&same_email).await,
        Err(StoreError::Conflict(_))
    ));
    assert!(store.get(&same_email.external_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_writes_only_supplied_fields() {
    require_emulator!();

    let store = test_store().await;
    let id = unique_id("update");
    let profile = test_profile(&id);
    store.insert(&profile).await.unwrap();

    let updated = store.update(&id, &patch(json!({ "age": 31 }))).await.unwrap();
    assert_eq!(updated.age, Some(31));
    assert_eq!(updated.email, profile.email);
    assert_eq!(updated.created_at, profile.created_at);

    let updated = store
        .update(&id, &patch(json!({ "gender": null })))
        .await
        .unwrap();
    assert_eq!(updated.gender, None);
    assert_eq!(updated.age, Some(31));
}

#[tokio::test]
async fn test_update_moves_email_claim() {
    require_emulator!();

    let store = test_store().await;
    let id = unique_id("email-move");
    let profile = test_profile(&id);
    store.insert(&profile).await.unwrap();

    let new_email = format!("moved-{}@example.com", id);
    let updated = store
        .update(&id, &patch(json!({ "email": new_email })))
        .await
        .unwrap();
    assert_eq!(updated.email, new_email);

    // The old address can be registered again.
    let mut reuse = test_profile(&unique_id("email-reuse"));
    reuse.email = profile.email.clone();
    store.insert(&reuse).await.unwrap();
}

#[tokio::test]
async fn test_update_missing_profile() {
    require_emulator!();

    let store = test_store().await;
    let id = unique_id("missing");
    assert_eq!(
        store.update(&id, &patch(json!({ "age": 40 }))).await,
        Err(StoreError::NotFound(id.clone()))
    );
}

#[tokio::test]
async fn test_concurrent_inserts_single_winner() {
    require_emulator!();

    let store = test_store().await;
    let id = unique_id("race");

    let attempts = (0..5).map(|i| {
        let store = store.clone();
        let mut profile = test_profile(&id);
        profile.email = format!("race-{}-{}@example.com", i, id);
        async move { store.insert(&profile).await }
    });

    let results = join_all(attempts).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(StoreError::Conflict(_)))));
}
