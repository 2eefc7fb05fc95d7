// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process profile store.
//!
//! Two maps mirror the Firestore layout: profiles by external ID and email
//! claims by email. Claims are taken through the entry API so two creates
//! for the same key cannot both succeed. Lock order is always profiles
//! before emails.

use crate::db::StoreError;
use crate::models::UserProfile;
use crate::schema::ProfilePatch;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryProfiles {
    profiles: Arc<DashMap<String, UserProfile>>,
    /// email -> external ID
    emails: Arc<DashMap<String, String>>,
}

impl MemoryProfiles {
    pub fn get(&self, external_id: &str) -> Option<UserProfile> {
        self.profiles.get(external_id).map(|p| p.value().clone())
    }

    pub fn insert(&self, profile: &UserProfile) -> Result<(), StoreError> {
        match self.profiles.entry(profile.external_id.clone()) {
            Entry::Occupied(_) => Err(StoreError::duplicate_external_id()),
            Entry::Vacant(slot) => {
                match self.emails.entry(profile.email.clone()) {
                    Entry::Occupied(_) => return Err(StoreError::duplicate_email()),
                    Entry::Vacant(claim) => {
                        claim.insert(profile.external_id.clone());
                    }
                }
                slot.insert(profile.clone());
                Ok(())
            }
        }
    }

    pub fn update(&self, external_id: &str, patch: &ProfilePatch) -> Result<UserProfile, StoreError> {
        let mut entry = self
            .profiles
            .get_mut(external_id)
            .ok_or_else(|| StoreError::NotFound(external_id.to_string()))?;
        let profile = entry.value_mut();

        if let Some(new_email) = patch.email() {
            if new_email != profile.email {
                match self.emails.entry(new_email.to_string()) {
                    Entry::Occupied(_) => return Err(StoreError::duplicate_email()),
                    Entry::Vacant(claim) => {
                        claim.insert(external_id.to_string());
                    }
                }
                self.emails.remove(&profile.email);
            }
        }

        patch.apply_to(profile);
        Ok(profile.clone())
    }
}
