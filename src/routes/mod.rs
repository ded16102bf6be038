// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod export;
pub mod notifications;
pub mod profile;
pub mod sync;
pub mod triggers;

use crate::error::{AppError, Result};
use crate::middleware::attach_identity;
use crate::models::UnverifiedUserId;
use crate::AppState;
use axum::body::Bytes;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// `?userId=` on the caller-supplied-id endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserIdQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

impl UserIdQuery {
    pub(crate) fn parse(&self) -> Result<UnverifiedUserId> {
        UnverifiedUserId::from_param(self.user_id.as_deref())
    }
}

/// Plain `{success: true}` body.
#[derive(Serialize)]
pub(crate) struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub(crate) fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Serialize `value`, or `{}` when there is nothing stored.
pub(crate) fn or_empty<T: Serialize>(value: Option<T>) -> Result<serde_json::Value> {
    match value {
        Some(value) => Ok(serde_json::to_value(value).map_err(anyhow::Error::from)?),
        None => Ok(serde_json::Value::Object(Default::default())),
    }
}

/// Decode a JSON request body, mapping failures to 400.
///
/// An empty body decodes as `T::default()` when `allow_empty` is set.
pub(crate) fn parse_json_body<T: DeserializeOwned + Default>(
    body: &Bytes,
    allow_empty: bool,
) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return if allow_empty {
            Ok(T::default())
        } else {
            Err(AppError::BadRequest("request body is required".to_string()))
        };
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from the app's web origin and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Routes keyed by a caller-supplied userId, plus trigger delivery
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(profile::routes())
        .merge(export::routes())
        .merge(sync::routes())
        .merge(notifications::routes())
        .merge(triggers::routes());

    // Routes keyed by the verified ID token identity
    let identity_routes = Router::new()
        .merge(profile::identity_routes())
        .merge(notifications::identity_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            attach_identity,
        ));

    Router::new()
        .merge(public_routes)
        .merge(identity_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Body {
        token: Option<String>,
    }

    #[test]
    fn test_parse_json_body() {
        let empty = Bytes::from_static(b"  ");
        assert_eq!(parse_json_body::<Body>(&empty, true).unwrap(), Body::default());
        assert!(matches!(
            parse_json_body::<Body>(&empty, false),
            Err(AppError::BadRequest(_))
        ));

        let bad = Bytes::from_static(b"{not json");
        assert!(matches!(
            parse_json_body::<Body>(&bad, true),
            Err(AppError::BadRequest(_))
        ));

        let ok = Bytes::from_static(br#"{"token":"t1"}"#);
        assert_eq!(
            parse_json_body::<Body>(&ok, false).unwrap().token.as_deref(),
            Some("t1")
        );
    }

    #[test]
    fn test_or_empty() {
        assert_eq!(or_empty::<String>(None).unwrap(), serde_json::json!({}));
        assert_eq!(
            or_empty(Some(serde_json::json!({"a": 1}))).unwrap(),
            serde_json::json!({"a": 1})
        );
    }
}
