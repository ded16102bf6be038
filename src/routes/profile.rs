// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes.

use super::{or_empty, parse_json_body, SuccessResponse, UserIdQuery};
use crate::error::{AppError, Result};
use crate::middleware::Caller;
use crate::models::{Profile, ProfileUpdate};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Routes keyed by a caller-supplied userId.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/update-profile", post(update_profile))
}

/// Routes that need the identity middleware.
pub fn identity_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get-user-stats", get(get_user_stats))
        .route("/users", post(create_profile))
}

/// Merge the given fields into an existing profile.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
    body: Bytes,
) -> Result<Json<SuccessResponse>> {
    let user = query.parse()?;
    let user_id = user.user_id();

    if !state.profiles.exists(user_id).await {
        tracing::warn!(user_id = %user_id, "Profile update for unknown user");
        return Err(AppError::Unauthorized);
    }

    let update: ProfileUpdate = parse_json_body(&body, false)?;
    update
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if update.is_empty() {
        return Err(AppError::BadRequest("no fields to update".to_string()));
    }

    if !state.profiles.update(user_id, &update).await {
        return Err(AppError::Database("Failed to update profile".to_string()));
    }

    Ok(SuccessResponse::ok())
}

#[derive(Serialize)]
struct UserStatsResponse {
    success: bool,
    profile: serde_json::Value,
}

/// The caller's own profile, or `{}` if none exists yet.
async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<UserStatsResponse>> {
    let identity = caller.require()?;
    let profile = state.profiles.get(identity.user_id()).await?;

    Ok(Json(UserStatsResponse {
        success: true,
        profile: or_empty(profile)?,
    }))
}

/// Body of `POST /users`. Both fields fall back to the ID token / empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProfileRequest {
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Serialize)]
struct CreateProfileResponse {
    success: bool,
    profile: Profile,
}

/// Create the caller's profile on first sign-in.
async fn create_profile(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateProfileResponse>)> {
    let identity = caller.require()?;
    let request: CreateProfileRequest = parse_json_body(&body, true)?;

    let email = request
        .email
        .as_deref()
        .or(identity.email())
        .unwrap_or_default();
    let display_name = request.display_name.as_deref().unwrap_or_default();

    let profile = state
        .profiles
        .create(identity.user_id(), email, display_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProfileResponse {
            success: true,
            profile,
        }),
    ))
}
