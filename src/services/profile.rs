// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile store: reads and writes the `users/{uid}` document.

use crate::db::{paths, to_document, Document, DocumentStore, StoreError};
use crate::models::{Profile, ProfileUpdate, UserId};
use crate::time_utils::now_rfc3339;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn DocumentStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// True iff a profile exists. Fails closed: lookup errors read as absent.
    pub async fn exists(&self, user_id: &UserId) -> bool {
        match self.store.get(&paths::user(user_id)).await {
            Ok(doc) => doc.is_some(),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Profile lookup failed; treating as absent");
                false
            }
        }
    }

    /// The stored profile fields as written, or `None` if the user has none.
    ///
    /// Not decoded into [`Profile`]: clients write nullable names and numeric
    /// timestamps that are returned unchanged.
    pub async fn get(&self, user_id: &UserId) -> Result<Option<Document>, StoreError> {
        self.store.get(&paths::user(user_id)).await
    }

    /// Write a new profile with default theme settings, replacing any existing one.
    pub async fn create(
        &self,
        user_id: &UserId,
        email: &str,
        display_name: &str,
    ) -> Result<Profile, StoreError> {
        let profile =
            Profile::new_with_defaults(user_id.as_str(), email, display_name, &now_rfc3339());

        self.store
            .set(&paths::user(user_id), to_document(&profile)?)
            .await?;

        tracing::info!(user_id = %user_id, "Profile created");
        Ok(profile)
    }

    /// Merge the given fields into the existing profile.
    ///
    /// Returns `false` (never an error) if the write fails, including when
    /// the profile does not exist.
    pub async fn update(&self, user_id: &UserId, update: &ProfileUpdate) -> bool {
        let fields = match to_document(update) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to encode profile update");
                return false;
            }
        };

        match self.store.update(&paths::user(user_id), fields).await {
            Ok(()) => {
                tracing::debug!(user_id = %user_id, "Profile updated");
                true
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Profile update failed");
                false
            }
        }
    }
}
