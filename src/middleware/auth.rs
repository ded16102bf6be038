// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ID token middleware.
//!
//! Attaches a [`Caller`] extension to every request on the identity routes.
//! A request without an `Authorization` header gets a caller with no
//! identity; the handler decides whether that is acceptable. A header that
//! fails verification is rejected here.

use crate::error::AppError;
use crate::models::VerifiedIdentity;
use crate::services::IdentityError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// The request's caller, as established by the middleware.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub identity: Option<VerifiedIdentity>,
}

impl Caller {
    /// The verified identity, or 401.
    pub fn require(&self) -> Result<&VerifiedIdentity, AppError> {
        self.identity.as_ref().ok_or(AppError::Unauthorized)
    }
}

/// Verify the bearer token (when present) and attach a [`Caller`].
pub async fn attach_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match request.headers().get(header::AUTHORIZATION) {
        None => None,
        Some(value) => match state.identity_verifier.verify_bearer(Some(value)).await {
            Ok(identity) => Some(identity),
            Err(IdentityError::Unauthorized(reason)) => {
                tracing::warn!(reason = %reason, "Rejected request with invalid ID token");
                return AppError::InvalidToken.into_response();
            }
            Err(IdentityError::Transient(reason)) => {
                tracing::error!(reason = %reason, "ID token verification transient failure");
                return AppError::Internal(anyhow::anyhow!(
                    "identity verification unavailable"
                ))
                .into_response();
            }
        },
    };

    if let Some(identity) = &identity {
        tracing::debug!(user_id = %identity.user_id(), "Caller identity verified");
    }

    request.extensions_mut().insert(Caller { identity });
    next.run(request).await
}
