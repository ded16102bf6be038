// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync metadata tracker.
//!
//! One merge-upserted cell per user at `users/{uid}/syncMetadata/latest`.
//! Concurrent writers race; the last write wins and each write carries a
//! complete action+timestamp pair.

use crate::db::{from_document, paths, to_document, DocumentStore, StoreError};
use crate::models::{SyncAction, SyncMetadata, UserId};
use crate::time_utils::now_rfc3339;
use std::sync::Arc;

#[derive(Clone)]
pub struct SyncTracker {
    store: Arc<dyn DocumentStore>,
}

impl SyncTracker {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record the latest mutation for a user.
    pub async fn record_action(&self, user_id: &UserId, action: SyncAction) -> Result<(), StoreError> {
        let cell = SyncMetadata {
            last_action: action.as_str().to_string(),
            timestamp: now_rfc3339(),
        };

        self.store
            .merge(&paths::sync_latest(user_id), to_document(&cell)?)
            .await?;

        tracing::debug!(user_id = %user_id, action = %action, "Sync metadata updated");
        Ok(())
    }

    /// The last recorded action, or `None` if there has been no sync activity.
    pub async fn get_last_sync(&self, user_id: &UserId) -> Result<Option<SyncMetadata>, StoreError> {
        let path = paths::sync_latest(user_id);
        self.store
            .get(&path)
            .await?
            .map(|doc| from_document(&path, doc))
            .transpose()
    }
}
