// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed profile store.
//!
//! Layout:
//! - `users/{externalId}` holds the profile document
//! - `user_emails/{email}` holds the owning external ID
//!
//! Firestore has no secondary unique indexes, so the email claim document is
//! the index. Both documents are written with `Exists(false)` preconditions in
//! one transaction, which makes the commit the single arbiter of conflicts.

use crate::db::{collections, StoreError};
use crate::models::UserProfile;
use crate::schema::ProfilePatch;
use firestore::errors::FirestoreError;
use firestore::FirestoreWritePrecondition;
use serde::{Deserialize, Serialize};

/// Document stored in `user_emails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailClaim {
    external_id: String,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreProfiles {
    client: firestore::FirestoreDb,
}

impl FirestoreProfiles {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str) -> Result<Self, StoreError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::connect_emulator(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            StoreError::Unavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");
        Ok(Self { client })
    }

    /// Connect to the emulator with a dummy token instead of local credentials.
    async fn connect_emulator(project_id: &str) -> Result<Self, StoreError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Unavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore (Emulator)");
        Ok(Self { client })
    }

    pub async fn get(&self, external_id: &str) -> Result<Option<UserProfile>, StoreError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(external_id)
            .await
            .map_err(unavailable)
    }

    pub async fn insert(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(unavailable)?;

        self.client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(&profile.external_id)
            .object(profile)
            .add_to_transaction(&mut transaction)
            .map_err(unavailable)?;

        self.claim_email(&profile.email, &profile.external_id, &mut transaction)?;

        transaction.commit().await.map_err(|e| match e {
            FirestoreError::DataConflictError(_) => {
                // The commit does not say which of the two documents existed.
                StoreError::Conflict("User or email already exists".to_string())
            }
            other => unavailable(other),
        })?;

        tracing::debug!(external_id = %profile.external_id, "Profile document created");
        Ok(())
    }

    pub async fn update(
        &self,
        external_id: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, StoreError> {
        let mut profile = self
            .get(external_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(external_id.to_string()))?;
        let old_email = profile.email.clone();
        patch.apply_to(&mut profile);

        let paths = patch.field_paths();
        if paths.is_empty() {
            return Ok(profile);
        }

        if profile.email == old_email {
            // Only the supplied fields are written, so concurrent updates to
            // other fields survive.
            return self
                .client
                .fluent()
                .update()
                .fields(paths)
                .in_col(collections::USERS)
                .precondition(FirestoreWritePrecondition::Exists(true))
                .document_id(external_id)
                .object(&profile)
                .execute::<UserProfile>()
                .await
                .map_err(|e| write_error(e, external_id));
        }

        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(unavailable)?;

        self.client
            .fluent()
            .update()
            .fields(paths)
            .in_col(collections::USERS)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(external_id)
            .object(&profile)
            .add_to_transaction(&mut transaction)
            .map_err(unavailable)?;

        self.claim_email(&profile.email, external_id, &mut transaction)?;

        self.client
            .fluent()
            .delete()
            .from(collections::USER_EMAILS)
            .document_id(email_doc_id(&old_email))
            .add_to_transaction(&mut transaction)
            .map_err(unavailable)?;

        transaction
            .commit()
            .await
            .map_err(|e| write_error(e, external_id))?;

        tracing::debug!(external_id, "Email claim moved");

        self.get(external_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(external_id.to_string()))
    }

    /// Add a write to the transaction that fails the commit if the email is taken.
    fn claim_email(
        &self,
        email: &str,
        external_id: &str,
        transaction: &mut firestore::FirestoreTransaction<'_>,
    ) -> Result<(), StoreError> {
        self.client
            .fluent()
            .update()
            .in_col(collections::USER_EMAILS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(email_doc_id(email))
            .object(&EmailClaim {
                external_id: external_id.to_string(),
            })
            .add_to_transaction(transaction)
            .map_err(unavailable)?;
        Ok(())
    }
}

/// Document IDs may not contain `/`; emails are percent-encoded.
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

fn unavailable(e: FirestoreError) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Map a precondition failure on a profile write to the domain error.
fn write_error(e: FirestoreError, external_id: &str) -> StoreError {
    match e {
        FirestoreError::DataConflictError(_) => StoreError::duplicate_email(),
        FirestoreError::DataNotFoundError(_) => StoreError::NotFound(external_id.to_string()),
        other => unavailable(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_doc_id_is_path_safe() {
        assert_eq!(email_doc_id("a@b.com"), "a%40b.com");
        assert!(!email_doc_id("odd/name@b.com").contains('/'));
    }
}
