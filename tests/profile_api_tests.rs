// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile endpoint tests: update-profile, get-user-stats, and sign-in creation.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use warranty_tracker::db::{paths, DocumentStore};
use warranty_tracker::models::UserId;

mod common;
use common::{body_json, create_test_app, create_test_id_token};

fn uid(raw: &str) -> UserId {
    UserId::parse(raw).unwrap()
}

fn update_request(query: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/update-profile{query}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// update-profile
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_update_profile_requires_user_id() {
    let app = create_test_app();

    for query in ["", "?userId=", "?userId=%20u1", "?userId=u1%20"] {
        let response = app
            .call(update_request(query, r#"{"displayName":"X"}"#))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["details"], "userId is required");
    }
}

#[tokio::test]
async fn test_update_profile_unknown_user_is_unauthorized() {
    let app = create_test_app();

    let response = app
        .call(update_request("?userId=ghost", r#"{"displayName":"X"}"#))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.store.is_empty(), "nothing may be written for an unknown user");
}

#[tokio::test]
async fn test_update_profile_merges_fields() {
    let app = create_test_app();
    let created = app
        .state
        .profiles
        .create(&uid("u1"), "u1@example.com", "Before")
        .await
        .unwrap();

    let response = app
        .call(update_request(
            "?userId=u1",
            r#"{"displayName":"After","themeMode":"DARK"}"#,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"success": true}));

    let profile = app.state.profiles.get(&uid("u1")).await.unwrap().unwrap();
    assert_eq!(profile["displayName"], "After");
    assert_eq!(profile["themeMode"], "DARK");
    assert_eq!(profile["email"], created.email);
    assert_eq!(profile["primaryColor"], created.primary_color);
    assert_eq!(profile["createdAt"], created.created_at);
}

#[tokio::test]
async fn test_update_profile_rejects_invalid_bodies() {
    let app = create_test_app();
    app.state
        .profiles
        .create(&uid("u1"), "u1@example.com", "U1")
        .await
        .unwrap();

    for body in [
        "",
        "{}",
        "not json",
        r#"{"uid":"someone-else"}"#,
        r#"{"primaryColor":"teal"}"#,
        r#"{"email":"nope"}"#,
        r#"{"themeMode":"PURPLE"}"#,
    ] {
        let response = app.call(update_request("?userId=u1", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    let profile = app.state.profiles.get(&uid("u1")).await.unwrap().unwrap();
    assert_eq!(profile["uid"], "u1");
    assert_eq!(profile["email"], "u1@example.com");
}

#[tokio::test]
async fn test_update_profile_storage_outage_fails_closed() {
    let app = create_test_app();
    app.state
        .profiles
        .create(&uid("u1"), "u1@example.com", "U1")
        .await
        .unwrap();
    app.store.set_offline(true);

    let response = app
        .call(update_request("?userId=u1", r#"{"displayName":"X"}"#))
        .await;

    // The existence check cannot confirm the user, so the caller is refused.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ═══════════════════════════════════════════════════════════════════════════
// get-user-stats
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_get_user_stats_requires_identity() {
    let app = create_test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/get-user-stats?userId=u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_user_stats_returns_own_profile() {
    let app = create_test_app();
    let token = create_test_id_token(&app.state.config, "u1");

    let request = |token: &str| {
        Request::builder()
            .uri("/get-user-stats")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.call(request(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "profile": {}})
    );

    app.state
        .profiles
        .create(&uid("u1"), "u1@example.com", "U1")
        .await
        .unwrap();

    let body = body_json(app.call(request(&token)).await).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["profile"]["uid"], "u1");
    assert_eq!(body["profile"]["themeMode"], "SYSTEM");
    assert_eq!(body["profile"]["primaryColor"], "#079992");
    assert_eq!(body["profile"]["secondaryColor"], "#047A74");
}

#[tokio::test]
async fn test_get_user_stats_returns_client_written_profile() {
    let app = create_test_app();
    let token = create_test_id_token(&app.state.config, "u1");
    let stored = json!({
        "uid": "u1",
        "email": "u1@example.com",
        "displayName": null,
        "createdAt": 1700000000000_i64
    });
    app.store
        .set(&paths::user(&uid("u1")), stored.as_object().cloned().unwrap())
        .await
        .unwrap();

    let response = app
        .call(
            Request::builder()
                .uri("/get-user-stats")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "profile": stored})
    );
}

#[tokio::test]
async fn test_get_user_stats_storage_error_is_500() {
    let app = create_test_app();
    let token = create_test_id_token(&app.state.config, "u1");
    app.store.set_offline(true);

    let response = app
        .call(
            Request::builder()
                .uri("/get-user-stats")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "database_error");
}

// ═══════════════════════════════════════════════════════════════════════════
// POST /users
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_profile_on_sign_in() {
    let app = create_test_app();
    let token = create_test_id_token(&app.state.config, "newbie");

    let response = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"displayName":"New User"}"#))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["profile"]["uid"], "newbie");
    // Email falls back to the ID token claim.
    assert_eq!(body["profile"]["email"], "newbie@example.com");
    assert_eq!(body["profile"]["displayName"], "New User");

    assert!(app.state.profiles.exists(&uid("newbie")).await);
}

#[tokio::test]
async fn test_create_profile_requires_identity() {
    let app = create_test_app();

    let response = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.store.is_empty());
}
