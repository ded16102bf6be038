//! User profile model and its partial-update counterpart.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Default primary color for new profiles.
pub const DEFAULT_PRIMARY_COLOR: &str = "#079992";
/// Default secondary color for new profiles.
pub const DEFAULT_SECONDARY_COLOR: &str = "#047A74";

/// App theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

/// User profile stored at `users/{uid}`.
///
/// Fields missing from the stored document decode as defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    /// When the profile was created (RFC 3339)
    pub created_at: String,
    pub theme_mode: ThemeMode,
    pub primary_color: String,
    pub secondary_color: String,
}

impl Profile {
    /// A fresh profile with the default theme.
    pub fn new_with_defaults(uid: &str, email: &str, display_name: &str, now: &str) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            created_at: now.to_string(),
            theme_mode: ThemeMode::System,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
        }
    }
}

/// Partial profile update. Only the fields present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_mode: Option<ThemeMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Accepts `#RRGGBB`.
fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}
