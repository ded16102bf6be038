// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod export;
pub mod identity;
pub mod record;
pub mod sync;
pub mod token;
pub mod user;

pub use export::{ExportDocument, ExportStats, ExportSummary, ExportUser};
pub use identity::{UnverifiedUserId, UserId, VerifiedIdentity};
pub use record::{Record, RecordCollection};
pub use sync::{SyncAction, SyncMetadata};
pub use token::DeliveryToken;
pub use user::{Profile, ProfileUpdate, ThemeMode};
