// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delivery token and test notification routes.

use super::{parse_json_body, SuccessResponse, UserIdQuery};
use crate::error::{AppError, Result};
use crate::middleware::Caller;
use crate::models::VerifiedIdentity;
use crate::services::DispatchReport;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of the test notification.
pub const TEST_NOTIFICATION_MESSAGE: &str = "This is a test notification!";

/// Routes keyed by a caller-supplied userId.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/send-test-notification", post(send_test_notification))
}

/// Routes that need the identity middleware.
pub fn identity_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register-token", post(register_token))
        .route("/unregister-token", post(unregister_token))
}

#[derive(Debug, Default, Deserialize)]
struct TokenRequest {
    #[serde(default)]
    token: String,
}

/// Identity and token, both required. Either missing is a validation error.
fn token_inputs(caller: &Caller, body: &Bytes) -> Result<(VerifiedIdentity, String)> {
    let request: TokenRequest = parse_json_body(body, true)?;
    match &caller.identity {
        Some(identity) if !request.token.trim().is_empty() => {
            Ok((identity.clone(), request.token))
        }
        _ => Err(AppError::BadRequest(
            "userId and token are required".to_string(),
        )),
    }
}

async fn register_token(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Json<SuccessResponse>> {
    let (identity, token) = token_inputs(&caller, &body)?;
    state.notifier.register_token(&identity, &token).await?;
    Ok(SuccessResponse::ok())
}

async fn unregister_token(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Json<SuccessResponse>> {
    let (identity, token) = token_inputs(&caller, &body)?;
    state.notifier.unregister_token(&identity, &token).await?;
    Ok(SuccessResponse::ok())
}

#[derive(Serialize)]
struct TestNotificationResponse {
    success: bool,
    message: &'static str,
    delivery: DispatchReport,
}

/// Send the test message to every registered token. Delivery failures are
/// reported in `delivery`, never as an error status.
async fn send_test_notification(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<TestNotificationResponse>> {
    let user = query.parse()?;
    let delivery = state
        .notifier
        .dispatch(user.user_id(), TEST_NOTIFICATION_MESSAGE)
        .await;

    Ok(Json(TestNotificationResponse {
        success: true,
        message: "Notification sent",
        delivery,
    }))
}
