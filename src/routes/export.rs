// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data export routes.

use super::UserIdQuery;
use crate::error::{AppError, Result};
use crate::models::{ExportDocument, ExportSummary};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/export-all-data", get(export_all_data))
        .route("/export-summary", get(export_summary))
}

#[derive(Serialize)]
struct ExportResponse {
    success: bool,
    data: ExportDocument,
}

/// Full export. The user must have a profile.
async fn export_all_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<ExportResponse>> {
    let user = query.parse()?;
    let user_id = user.user_id();

    if !state.profiles.exists(user_id).await {
        tracing::warn!(user_id = %user_id, "Export requested for unknown user");
        return Err(AppError::Unauthorized);
    }

    let data = state.exporter.build_full_export(user_id).await?;
    Ok(Json(ExportResponse {
        success: true,
        data,
    }))
}

/// Counts only. No existence check.
async fn export_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<ExportSummary>> {
    let user = query.parse()?;
    let summary = state.exporter.build_summary(user.user_id()).await?;
    Ok(Json(summary))
}
