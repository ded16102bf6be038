// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export snapshots. Assembled on demand and never persisted.

use crate::db::Document;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Item counts for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct ExportStats {
    pub total_receipts: usize,
    pub total_warranties: usize,
    pub total_categories: usize,
}

/// Profile subset included in a full export. All fields are absent when the
/// user has no profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportUser {
    pub uid: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Full export of a user's data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// When the snapshot was taken (RFC 3339)
    pub export_date: String,
    pub user: ExportUser,
    pub stats: ExportStats,
    pub receipts: Vec<Document>,
    pub warranties: Vec<Document>,
    pub categories: Vec<Document>,
}

/// Counts-only export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct ExportSummary {
    pub export_date: String,
    pub user_id: String,
    pub stats: ExportStats,
}
