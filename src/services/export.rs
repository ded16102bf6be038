// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export aggregation.
//!
//! Reads a user's profile and record collections into a point-in-time
//! snapshot. The reads are independent (no transaction), and nothing is
//! written.

use crate::db::{paths, Document, DocumentStore, StoreError};
use crate::models::{
    ExportDocument, ExportStats, ExportSummary, ExportUser, RecordCollection, UserId,
};
use crate::time_utils::now_rfc3339;
use std::sync::Arc;

#[derive(Clone)]
pub struct Exporter {
    store: Arc<dyn DocumentStore>,
}

impl Exporter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Profile subset, counts, and every record of the user.
    pub async fn build_full_export(&self, user_id: &UserId) -> Result<ExportDocument, StoreError> {
        let user_path = paths::user(user_id);
        let (profile, receipts, warranties, categories) = tokio::try_join!(
            self.store.get(&user_path),
            self.records(user_id, RecordCollection::Receipts),
            self.records(user_id, RecordCollection::Warranties),
            self.records(user_id, RecordCollection::Categories),
        )?;

        let user = profile.as_ref().map(export_user).unwrap_or_default();
        let stats = ExportStats {
            total_receipts: receipts.len(),
            total_warranties: warranties.len(),
            total_categories: categories.len(),
        };

        tracing::info!(
            user_id = %user_id,
            receipts = stats.total_receipts,
            warranties = stats.total_warranties,
            categories = stats.total_categories,
            "Full export built"
        );

        Ok(ExportDocument {
            export_date: now_rfc3339(),
            user,
            stats,
            receipts,
            warranties,
            categories,
        })
    }

    /// Counts only.
    pub async fn build_summary(&self, user_id: &UserId) -> Result<ExportSummary, StoreError> {
        let stats = self.collection_counts(user_id).await?;
        Ok(ExportSummary {
            export_date: now_rfc3339(),
            user_id: user_id.to_string(),
            stats,
        })
    }

    /// Number of documents in each record collection.
    pub async fn collection_counts(&self, user_id: &UserId) -> Result<ExportStats, StoreError> {
        let (receipts, warranties, categories) = tokio::try_join!(
            self.count(user_id, RecordCollection::Receipts),
            self.count(user_id, RecordCollection::Warranties),
            self.count(user_id, RecordCollection::Categories),
        )?;

        Ok(ExportStats {
            total_receipts: receipts,
            total_warranties: warranties,
            total_categories: categories,
        })
    }

    async fn records(
        &self,
        user_id: &UserId,
        collection: RecordCollection,
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.store.list(&paths::records(user_id, collection)).await?;
        Ok(docs.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn count(&self, user_id: &UserId, collection: RecordCollection) -> Result<usize, StoreError> {
        Ok(self
            .store
            .list(&paths::records(user_id, collection))
            .await?
            .len())
    }
}

fn export_user(profile: &Document) -> ExportUser {
    let field = |name: &str| {
        profile
            .get(name)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    ExportUser {
        uid: field("uid"),
        email: field("email"),
        display_name: field("displayName"),
    }
}
