//! Database layer (document store abstraction plus backends).

pub mod firestore;
pub mod memory;
pub mod store;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use store::{
    from_document, to_document, CollectionPath, DocPath, Document, DocumentStore, StoreError,
};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const RECEIPTS: &str = "receipts";
    pub const WARRANTIES: &str = "warranties";
    pub const CATEGORIES: &str = "categories";
    /// Registered push tokens (keyed by token value)
    pub const FCM_TOKENS: &str = "fcmTokens";
    /// Per-user sync status cell
    pub const SYNC_METADATA: &str = "syncMetadata";
}

/// Document id of the single sync status cell under `syncMetadata`.
pub const SYNC_LATEST_DOC: &str = "latest";

/// Path helpers for the per-user layout `users/{uid}/...`.
pub mod paths {
    use super::{collections, CollectionPath, DocPath, SYNC_LATEST_DOC};
    use crate::models::{RecordCollection, UserId};

    pub fn user(user_id: &UserId) -> DocPath {
        DocPath::root(collections::USERS, user_id.as_str())
    }

    pub fn records(user_id: &UserId, collection: RecordCollection) -> CollectionPath {
        user(user_id).collection(collection.as_str())
    }

    pub fn tokens(user_id: &UserId) -> CollectionPath {
        user(user_id).collection(collections::FCM_TOKENS)
    }

    /// Token documents are keyed by the URL-encoded token value.
    pub fn token(user_id: &UserId, token: &str) -> DocPath {
        tokens(user_id).doc(urlencoding::encode(token))
    }

    pub fn sync_latest(user_id: &UserId) -> DocPath {
        user(user_id)
            .collection(collections::SYNC_METADATA)
            .doc(SYNC_LATEST_DOC)
    }
}
