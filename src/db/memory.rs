// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store.
//!
//! Used for offline runs and tests. Supports fault injection so callers can
//! exercise storage failure paths without a real backend.

use crate::db::store::{CollectionPath, DocPath, Document, DocumentStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory store keyed by full document path.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<DashMap<String, Document>>,
    faults: Arc<Faults>,
}

#[derive(Default)]
struct Faults {
    offline: AtomicBool,
    failing_prefixes: RwLock<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail until `clear_faults` is called.
    pub fn set_offline(&self, offline: bool) {
        self.faults.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail every operation whose path starts with `prefix`.
    pub fn fail_path_prefix(&self, prefix: impl Into<String>) {
        if let Ok(mut prefixes) = self.faults.failing_prefixes.write() {
            prefixes.push(prefix.into());
        }
    }

    pub fn clear_faults(&self) {
        self.set_offline(false);
        if let Ok(mut prefixes) = self.faults.failing_prefixes.write() {
            prefixes.clear();
        }
    }

    /// Number of stored documents (all collections).
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn check(&self, path: &str) -> Result<(), StoreError> {
        if self.faults.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(
                "Database not connected (offline mode)".to_string(),
            ));
        }

        let failing = self
            .faults
            .failing_prefixes
            .read()
            .map(|prefixes| prefixes.iter().any(|p| path.starts_with(p.as_str())))
            .unwrap_or(false);

        if failing {
            return Err(StoreError::Backend(format!("Injected failure at {}", path)));
        }

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let key = path.to_string();
        self.check(&key)?;
        Ok(self.docs.get(&key).map(|doc| doc.value().clone()))
    }

    async fn set(&self, path: &DocPath, doc: Document) -> Result<(), StoreError> {
        let key = path.to_string();
        self.check(&key)?;
        self.docs.insert(key, doc);
        Ok(())
    }

    async fn merge(&self, path: &DocPath, fields: Document) -> Result<(), StoreError> {
        let key = path.to_string();
        self.check(&key)?;
        // The entry guard holds the shard lock, so the merge is atomic per document.
        self.docs.entry(key).or_default().extend(fields);
        Ok(())
    }

    async fn update(&self, path: &DocPath, fields: Document) -> Result<(), StoreError> {
        let key = path.to_string();
        self.check(&key)?;
        match self.docs.get_mut(&key) {
            Some(mut doc) => {
                doc.extend(fields);
                Ok(())
            }
            None => Err(StoreError::NotFound(key)),
        }
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        let key = path.to_string();
        self.check(&key)?;
        self.docs.remove(&key);
        Ok(())
    }

    async fn list(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let prefix = format!("{}/", collection);
        self.check(&prefix)?;

        let mut docs: Vec<(String, Document)> = self
            .docs
            .iter()
            .filter_map(|entry| {
                let id = entry.key().strip_prefix(&prefix)?;
                // Direct children only; skip documents in nested subcollections.
                if id.contains('/') {
                    return None;
                }
                Some((id.to_string(), entry.value().clone()))
            })
            .collect();

        docs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_set_replaces_and_merge_preserves() {
        let store = MemoryStore::new();
        let path = DocPath::root("users", "u1");

        store
            .set(&path, doc(json!({"a": 1, "b": 2})))
            .await
            .unwrap();
        store.merge(&path, doc(json!({"b": 3, "c": 4}))).await.unwrap();
        assert_eq!(
            store.get(&path).await.unwrap(),
            Some(doc(json!({"a": 1, "b": 3, "c": 4})))
        );

        store.set(&path, doc(json!({"z": 0}))).await.unwrap();
        assert_eq!(store.get(&path).await.unwrap(), Some(doc(json!({"z": 0}))));
    }

    #[tokio::test]
    async fn test_update_requires_existing_document() {
        let store = MemoryStore::new();
        let path = DocPath::root("users", "missing");

        let err = store.update(&path, doc(json!({"a": 1}))).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_returns_direct_children_only() {
        let store = MemoryStore::new();
        let user = DocPath::root("users", "u1");
        let receipts = user.collection("receipts");

        store.set(&user, doc(json!({}))).await.unwrap();
        store
            .set(&receipts.doc("r2"), doc(json!({"title": "B"})))
            .await
            .unwrap();
        store
            .set(&receipts.doc("r1"), doc(json!({"title": "A"})))
            .await
            .unwrap();
        store
            .set(
                &receipts.doc("r1").collection("notes").doc("n1"),
                doc(json!({})),
            )
            .await
            .unwrap();

        let listed = store.list(&receipts).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let store = MemoryStore::new();
        let path = DocPath::root("users", "u1");

        store.fail_path_prefix("users/u1");
        assert!(store.get(&path).await.is_err());
        assert!(store.get(&DocPath::root("users", "u2")).await.is_ok());

        store.clear_faults();
        store.set_offline(true);
        assert!(store.delete(&path).await.is_err());

        store.clear_faults();
        assert!(store.delete(&path).await.is_ok());
    }
}
