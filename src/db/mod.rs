// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile persistence.
//!
//! [`ProfileStore`] is the handle the rest of the application is given. It is
//! constructed explicitly (`connect` or `in_memory`), cloned into request
//! handlers, and closed on shutdown. Uniqueness of `externalId` and `email`
//! is enforced by the backend itself, so concurrent creates race safely.

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreProfiles;
pub use self::memory::MemoryProfiles;

use crate::config::{Config, StoreBackend};
use crate::models::UserProfile;
use crate::schema::ProfilePatch;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Collection names as constants.
pub mod collections {
    /// Profiles, keyed by external ID
    pub const USERS: &str = "users";
    /// Email claims, keyed by encoded email; the unique index on email
    pub const USER_EMAILS: &str = "user_emails";
}

/// Storage-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),

    #[error("profile {0} not found")]
    NotFound(String),

    /// The backend could not be reached or did not answer in time.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn duplicate_external_id() -> Self {
        StoreError::Conflict("User already exists".to_string())
    }

    pub fn duplicate_email() -> Self {
        StoreError::Conflict("Email is already registered".to_string())
    }
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreProfiles),
    Memory(MemoryProfiles),
}

/// Injected handle over the profile collection.
#[derive(Clone)]
pub struct ProfileStore {
    backend: Backend,
    timeout: Duration,
    closed: Arc<AtomicBool>,
}

impl ProfileStore {
    /// Connect to the backend named in the configuration.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let backend = match config.store_backend {
            StoreBackend::Firestore => {
                Backend::Firestore(FirestoreProfiles::connect(&config.gcp_project_id).await?)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory profile store; data is lost on restart");
                Backend::Memory(MemoryProfiles::default())
            }
        };
        Ok(Self::with_backend(backend, config.store_timeout))
    }

    /// Process-local store for tests and local development.
    pub fn in_memory() -> Self {
        Self::with_backend(
            Backend::Memory(MemoryProfiles::default()),
            Config::default().store_timeout,
        )
    }

    fn with_backend(backend: Backend, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop serving requests. Later operations on any clone fail with
    /// [`StoreError::Unavailable`].
    pub async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("Profile store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Run a backend call under the open check and the operation deadline.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.is_closed() {
            return Err(StoreError::Unavailable("store is closed".to_string()));
        }
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "{} timed out after {:?}",
                op, self.timeout
            ))),
        }
    }

    /// Get a profile by external ID.
    pub async fn get(&self, external_id: &str) -> Result<Option<UserProfile>, StoreError> {
        match &self.backend {
            Backend::Firestore(db) => self.bounded("get", db.get(external_id)).await,
            Backend::Memory(db) => self.bounded("get", async { Ok(db.get(external_id)) }).await,
        }
    }

    /// Insert a new profile. Fails with [`StoreError::Conflict`] when the
    /// external ID or the email is already taken.
    pub async fn insert(&self, profile: &UserProfile) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Firestore(db) => self.bounded("insert", db.insert(profile)).await,
            Backend::Memory(db) => self.bounded("insert", async { db.insert(profile) }).await,
        }
    }

    /// Apply a patch to an existing profile and return the stored result.
    pub async fn update(
        &self,
        external_id: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, StoreError> {
        match &self.backend {
            Backend::Firestore(db) => self.bounded("update", db.update(external_id, patch)).await,
            Backend::Memory(db) => {
                self.bounded("update", async { db.update(external_id, patch) })
                    .await
            }
        }
    }
}
