// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync status route.

use super::{or_empty, UserIdQuery};
use crate::error::Result;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/get-sync-status", get(get_sync_status))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncStatusResponse {
    success: bool,
    /// `{}` when nothing has synced yet
    sync_metadata: serde_json::Value,
}

async fn get_sync_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<SyncStatusResponse>> {
    let user = query.parse()?;
    let metadata = state.sync.get_last_sync(user.user_id()).await?;

    Ok(Json(SyncStatusResponse {
        success: true,
        sync_metadata: or_empty(metadata)?,
    }))
}
