//! Sync metadata: the single "latest status" cell per user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutation actions recorded in sync metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    ReceiptCreated,
    WarrantyCreated,
    CategoryCreated,
    WarrantyUpdated,
    ReceiptDeleted,
    WarrantyDeleted,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::ReceiptCreated => "receipt_created",
            SyncAction::WarrantyCreated => "warranty_created",
            SyncAction::CategoryCreated => "category_created",
            SyncAction::WarrantyUpdated => "warranty_updated",
            SyncAction::ReceiptDeleted => "receipt_deleted",
            SyncAction::WarrantyDeleted => "warranty_deleted",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored at `users/{uid}/syncMetadata/latest`.
///
/// Other clients may write extra fields into the same document; they are
/// never clobbered because writes are merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncMetadata {
    pub last_action: String,
    /// When the action was recorded (RFC 3339)
    pub timestamp: String,
}
