// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.
//!
//! Documents are moved in and out of Firestore as JSON objects. Nested paths
//! (`users/{uid}/receipts/{id}`) map onto Firestore parent paths.

use crate::db::store::{CollectionPath, DocPath, Document, DocumentStore, StoreError};
use async_trait::async_trait;
use firestore::FirestoreWritePrecondition;

/// Field names the firestore crate injects into decoded documents.
const INJECTED_FIELD_PREFIX: &str = "_firestore_";
const INJECTED_ID_FIELD: &str = "_firestore_id";

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

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
            StoreError::Backend(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Resolve the Firestore parent path for a (possibly nested) collection.
    fn parent_path(&self, parent: Option<&DocPath>) -> Result<String, StoreError> {
        let Some(parent) = parent else {
            return Ok(self.client.get_documents_path().to_string());
        };

        let pairs = parent.pairs();
        let mut iter = pairs.into_iter();
        let Some((collection, id)) = iter.next() else {
            return Ok(self.client.get_documents_path().to_string());
        };

        let mut builder = self
            .client
            .parent_path(collection, id)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        for (collection, id) in iter {
            builder = builder
                .at(collection, id)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }

        Ok(builder.as_ref().to_string())
    }

    async fn write(
        &self,
        path: &DocPath,
        doc: Document,
        mask: Option<Vec<String>>,
        must_exist: bool,
    ) -> Result<(), StoreError> {
        let parent = self.parent_path(path.parent())?;
        let update = self.client.fluent().update();
        let update = match mask {
            Some(fields) => update.fields(fields),
            None => update,
        };

        let builder = update.in_col(path.collection_name());
        let builder = if must_exist {
            builder.precondition(FirestoreWritePrecondition::Exists(true))
        } else {
            builder
        };

        let _: () = builder
            .document_id(path.id())
            .parent(&parent)
            .object(&doc)
            .execute()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if must_exist && message.contains("NOT_FOUND") {
                    StoreError::NotFound(path.to_string())
                } else {
                    StoreError::Backend(message)
                }
            })?;
        Ok(())
    }
}

/// Remove the metadata fields added by the firestore crate, returning the id.
fn strip_injected_fields(doc: &mut Document) -> Option<String> {
    let id = doc
        .get(INJECTED_ID_FIELD)
        .and_then(|v| v.as_str())
        .map(str::to_string);
    doc.retain(|key, _| !key.starts_with(INJECTED_FIELD_PREFIX));
    id
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let parent = self.parent_path(path.parent())?;
        let doc: Option<Document> = self
            .client
            .fluent()
            .select()
            .by_id_in(path.collection_name())
            .parent(&parent)
            .obj()
            .one(path.id())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(doc.map(|mut doc| {
            strip_injected_fields(&mut doc);
            doc
        }))
    }

    async fn set(&self, path: &DocPath, doc: Document) -> Result<(), StoreError> {
        self.write(path, doc, None, false).await
    }

    async fn merge(&self, path: &DocPath, fields: Document) -> Result<(), StoreError> {
        let mask = fields.keys().cloned().collect();
        self.write(path, fields, Some(mask), false).await
    }

    async fn update(&self, path: &DocPath, fields: Document) -> Result<(), StoreError> {
        let mask = fields.keys().cloned().collect();
        self.write(path, fields, Some(mask), true).await
    }

    async fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        let parent = self.parent_path(path.parent())?;
        self.client
            .fluent()
            .delete()
            .from(path.collection_name())
            .parent(&parent)
            .document_id(path.id())
            .execute()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn list(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let parent = self.parent_path(collection.parent())?;
        let docs: Vec<Document> = self
            .client
            .fluent()
            .select()
            .from(collection.name())
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(docs
            .into_iter()
            .map(|mut doc| {
                let id = strip_injected_fields(&mut doc).unwrap_or_default();
                (id, doc)
            })
            .collect())
    }
}
