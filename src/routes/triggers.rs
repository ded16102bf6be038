// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trigger delivery: record created/updated/deleted events.
//!
//! The document-change source posts each event here with the shared
//! secret in `x-trigger-secret`.

use super::parse_json_body;
use crate::error::{AppError, Result};
use crate::models::{Record, RecordCollection, UserId};
use crate::services::events::{EffectOutcome, TriggerEvent, TriggerKind};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header carrying the trigger secret.
pub const TRIGGER_SECRET_HEADER: &str = "x-trigger-secret";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/triggers/{collection}/{kind}", post(handle_trigger))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerRequest {
    #[serde(default)]
    user_id: String,
    document_id: Option<String>,
    /// Record payload after the change (before it, for deletes)
    data: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct TriggerResponse {
    success: bool,
    effects: Vec<EffectOutcome>,
}

async fn handle_trigger(
    State(state): State<Arc<AppState>>,
    Path((collection, kind)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TriggerResponse>> {
    if !secret_matches(&headers, &state.config.trigger_secret) {
        tracing::warn!(collection = %collection, kind = %kind, "Rejected trigger with bad secret");
        return Err(AppError::Unauthorized);
    }

    let collection: RecordCollection = collection.parse().map_err(AppError::BadRequest)?;
    let kind: TriggerKind = kind.parse().map_err(AppError::BadRequest)?;

    let request: TriggerRequest = parse_json_body(&body, false)?;
    let user_id = UserId::parse(&request.user_id)
        .ok_or_else(|| AppError::BadRequest("userId is required".to_string()))?;

    let record = request.data.map(Record::from_payload).unwrap_or_default();

    let event = TriggerEvent {
        kind,
        collection,
        user_id,
        document_id: request.document_id,
        record,
    };

    let effects = state.events.handle(&event).await;
    Ok(Json(TriggerResponse {
        success: true,
        effects,
    }))
}

fn secret_matches(headers: &HeaderMap, expected: &str) -> bool {
    let Some(provided) = headers.get(TRIGGER_SECRET_HEADER) else {
        return false;
    };
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
