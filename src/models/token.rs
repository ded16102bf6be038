//! Push delivery token model.

use serde::{Deserialize, Serialize};

/// Stored at `users/{uid}/fcmTokens/{encoded token}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryToken {
    pub token: String,
    /// When the token was registered (RFC 3339)
    pub created_at: String,
}
