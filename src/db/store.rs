// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store interface.
//!
//! Documents are JSON objects addressed by hierarchical paths of the form
//! `collection/id[/collection/id...]`. Every backend guarantees per-document
//! atomicity for each individual operation and nothing more.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// A stored document body.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `update` targeted a document that does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid document at {path}: {reason}")]
    InvalidDocument { path: String, reason: String },

    #[error("{0}")]
    Backend(String),
}

/// Path to a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    parent: Option<Box<DocPath>>,
    collection: String,
    id: String,
}

/// Path to a collection, optionally nested under a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    parent: Option<DocPath>,
    name: String,
}

impl DocPath {
    /// A document in a top-level collection.
    pub fn root(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            parent: None,
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// A subcollection of this document.
    pub fn collection(&self, name: impl Into<String>) -> CollectionPath {
        CollectionPath {
            parent: Some(self.clone()),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    /// The document owning this document's collection, if nested.
    pub fn parent(&self) -> Option<&DocPath> {
        self.parent.as_deref()
    }

    /// `(collection, id)` pairs from the root down to this document.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = match &self.parent {
            Some(parent) => parent.pairs(),
            None => Vec::new(),
        };
        pairs.push((self.collection.as_str(), self.id.as_str()));
        pairs
    }
}

impl CollectionPath {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            parent: None,
            name: name.into(),
        }
    }

    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            parent: self.parent.clone().map(Box::new),
            collection: self.name.clone(),
            id: id.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&DocPath> {
        self.parent.as_ref()
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{}/", parent)?;
        }
        write!(f, "{}/{}", self.collection, self.id)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{}/", parent)?;
        }
        write!(f, "{}", self.name)
    }
}

/// Hierarchical document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read one document.
    async fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Write a document, replacing any existing content.
    async fn set(&self, path: &DocPath, doc: Document) -> Result<(), StoreError>;

    /// Upsert the given top-level fields, leaving other fields untouched.
    async fn merge(&self, path: &DocPath, fields: Document) -> Result<(), StoreError>;

    /// Like `merge`, but fails with `StoreError::NotFound` if the document is absent.
    async fn update(&self, path: &DocPath, fields: Document) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, path: &DocPath) -> Result<(), StoreError>;

    /// All documents directly in a collection, as `(id, document)` pairs.
    async fn list(&self, collection: &CollectionPath)
        -> Result<Vec<(String, Document)>, StoreError>;
}

/// Serialize a typed value into a document body.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Backend(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(StoreError::Backend(format!("serialization failed: {}", e))),
    }
}

/// Decode a document body into a typed value.
pub fn from_document<T: DeserializeOwned>(path: &DocPath, doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::Object(doc)).map_err(|e| {
        StoreError::InvalidDocument {
            path: path.to_string(),
            reason: e.to_string(),
        }
    })
}
