// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile create/read/update rules on top of the store.

use crate::db::{ProfileStore, StoreError};
use crate::error::{AppError, Result};
use crate::models::{GoalPlan, UserProfile};
use crate::schema::{is_storable_id, raw_external_id, ProfileInput};
use crate::time_utils::now_rfc3339;

/// Profile operations. Cheap to clone; shares the injected store.
#[derive(Clone)]
pub struct ProfileService {
    store: ProfileStore,
}

impl ProfileService {
    pub fn new(store: ProfileStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Create a profile.
    ///
    /// Checks run in order: existing external ID, schema, then the store's
    /// uniqueness constraints. The early lookup only gives a quicker answer;
    /// the insert is what decides concurrent races.
    pub async fn create(&self, input: ProfileInput) -> Result<UserProfile> {
        if let Some(external_id) = input.external_id.as_deref() {
            self.ensure_unused(external_id).await?;
        }
        self.insert_new(input).await
    }

    /// Create a profile from a raw JSON body.
    ///
    /// The external ID is checked before the body is parsed, so a duplicate
    /// ID wins over type and enum errors in the rest of the payload.
    pub async fn create_from_json(&self, body: serde_json::Value) -> Result<UserProfile> {
        if let Some(external_id) = raw_external_id(&body) {
            self.ensure_unused(external_id).await?;
        }
        let input = ProfileInput::from_json(body).map_err(AppError::Validation)?;
        self.insert_new(input).await
    }

    /// Conflict if a profile already uses `external_id`. IDs that could never
    /// be stored are left for the schema to report.
    async fn ensure_unused(&self, external_id: &str) -> Result<()> {
        if is_storable_id(external_id) && self.store.get(external_id).await?.is_some() {
            return Err(StoreError::duplicate_external_id().into());
        }
        Ok(())
    }

    async fn insert_new(&self, input: ProfileInput) -> Result<UserProfile> {
        let profile = input
            .into_new_profile(now_rfc3339())
            .map_err(AppError::Validation)?;

        self.store.insert(&profile).await?;
        tracing::info!(
            external_id = %profile.external_id,
            auth_provider = ?profile.auth_provider,
            "Profile created"
        );
        Ok(profile)
    }

    /// Get a profile by external ID.
    pub async fn get(&self, external_id: &str) -> Result<UserProfile> {
        if !is_storable_id(external_id) {
            return Err(StoreError::NotFound(external_id.to_string()).into());
        }
        self.store
            .get(external_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(external_id.to_string()).into())
    }

    /// Update the supplied fields of an existing profile.
    ///
    /// A missing profile is reported before the payload is looked at.
    pub async fn update(&self, external_id: &str, input: ProfileInput) -> Result<UserProfile> {
        let current = self.get(external_id).await?;

        let patch = input.into_patch().map_err(AppError::Validation)?;
        if patch.is_empty() {
            tracing::debug!(external_id, "Empty profile update");
            return Ok(current);
        }

        let updated = self.store.update(external_id, &patch).await?;
        tracing::info!(external_id, fields = ?patch.field_paths(), "Profile updated");
        Ok(updated)
    }

    /// Derive the weight goal plan for a profile.
    pub async fn plan(&self, external_id: &str) -> Result<GoalPlan> {
        let profile = self.get(external_id).await?;
        GoalPlan::from_profile(&profile).map_err(AppError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: serde_json::Value) -> ProfileInput {
        serde_json::from_value(value).unwrap()
    }

    fn service() -> ProfileService {
        ProfileService::new(ProfileStore::in_memory())
    }

    #[tokio::test]
    async fn test_duplicate_id_wins_over_invalid_payload() {
        let service = service();
        service
            .create(input(json!({
                "externalId": "u1",
                "email": "a@b.com",
                "name": "Ann",
                "authProvider": "email"
            })))
            .await
            .unwrap();

        // Same ID with a broken payload still reports the conflict first.
        let err = service
            .create(input(json!({ "externalId": "u1", "age": 5 })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_id_wins_over_type_errors() {
        let service = service();
        service
            .create_from_json(json!({
                "externalId": "u1",
                "email": "a@b.com",
                "name": "Ann",
                "authProvider": "email"
            }))
            .await
            .unwrap();

        let err = service
            .create_from_json(json!({
                "externalId": "u1",
                "email": "b@b.com",
                "name": "Bob",
                "authProvider": "facebook",
                "age": "thirty"
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unstorable_ids_never_reach_the_store() {
        let service = service();
        // A closed store fails every call, so any lookup would surface as 500.
        service.store().close().await;

        for id in ["", "a/b", "__x__"] {
            let err = service
                .create_from_json(json!({
                    "externalId": id,
                    "email": "a@b.com",
                    "name": "Ann",
                    "authProvider": "email"
                }))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "id {:?}", id);

            let err = service.get(id).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "id {:?}", id);

            let err = service.update(id, input(json!({ "age": 30 }))).await.unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "id {:?}", id);
        }
    }

    #[tokio::test]
    async fn test_update_missing_profile_ignores_payload() {
        let err = service()
            .update("ghost", input(json!({ "age": 500 })))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_created_at_survives_update() {
        let service = service();
        let created = service
            .create(input(json!({
                "externalId": "u1",
                "email": "a@b.com",
                "name": "Ann",
                "authProvider": "google"
            })))
            .await
            .unwrap();

        let updated = service
            .update(
                "u1",
                input(json!({ "createdAt": "2000-01-01T00:00:00Z", "name": "Annie" })),
            )
            .await
            .unwrap();

        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Annie");
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let service = service();
        service.store().close().await;
        let err = service.get("u1").await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }
}
