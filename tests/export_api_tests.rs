// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export endpoint tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use warranty_tracker::db::{paths, DocumentStore};
use warranty_tracker::models::{RecordCollection, UserId};

mod common;
use common::{body_json, create_test_app, TestApp};

fn uid(raw: &str) -> UserId {
    UserId::parse(raw).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn seed_records(app: &TestApp, user: &str, collection: RecordCollection, titles: &[&str]) {
    for (i, title) in titles.iter().enumerate() {
        let doc = json!({"title": title, "amount": i, "tags": ["a", "b"]});
        app.store
            .set(
                &paths::records(&uid(user), collection).doc(format!("doc{i}")),
                doc.as_object().cloned().unwrap(),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_export_all_data_requires_user_id() {
    let app = create_test_app();
    let response = app.call(get("/export-all-data")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_all_data_unknown_user_is_unauthorized() {
    let app = create_test_app();
    // Records without a profile are still not exportable.
    seed_records(&app, "ghost", RecordCollection::Receipts, &["r"]).await;

    let response = app.call(get("/export-all-data?userId=ghost")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_export_all_data_shape_and_counts() {
    let app = create_test_app();
    app.state
        .profiles
        .create(&uid("u1"), "u1@example.com", "User One")
        .await
        .unwrap();
    seed_records(&app, "u1", RecordCollection::Receipts, &["Milk", "Bread"]).await;
    seed_records(&app, "u1", RecordCollection::Warranties, &["TV"]).await;
    seed_records(&app, "u2", RecordCollection::Receipts, &["Not mine"]).await;

    let response = app.call(get("/export-all-data?userId=u1")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert!(data["exportDate"].as_str().unwrap().ends_with('Z'));
    assert_eq!(
        data["user"],
        json!({"uid": "u1", "email": "u1@example.com", "displayName": "User One"})
    );
    assert_eq!(
        data["stats"],
        json!({"totalReceipts": 2, "totalWarranties": 1, "totalCategories": 0})
    );
    assert_eq!(data["receipts"].as_array().unwrap().len(), 2);
    assert_eq!(data["warranties"].as_array().unwrap().len(), 1);
    assert_eq!(data["categories"], json!([]));

    // Record payloads are exported verbatim.
    assert_eq!(
        data["warranties"][0],
        json!({"title": "TV", "amount": 0, "tags": ["a", "b"]})
    );
}

#[tokio::test]
async fn test_export_summary_has_no_existence_check() {
    let app = create_test_app();
    seed_records(&app, "anyone", RecordCollection::Categories, &["Home", "Work"]).await;

    let response = app.call(get("/export-summary?userId=anyone")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["userId"], "anyone");
    assert_eq!(
        body["stats"],
        json!({"totalReceipts": 0, "totalWarranties": 0, "totalCategories": 2})
    );
    assert!(body["exportDate"].is_string());
}

#[tokio::test]
async fn test_export_summary_requires_user_id() {
    let app = create_test_app();
    let response = app.call(get("/export-summary?userId=")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_storage_failure_is_500() {
    let app = create_test_app();
    app.state
        .profiles
        .create(&uid("u1"), "u1@example.com", "U1")
        .await
        .unwrap();
    app.store.fail_path_prefix("users/u1/receipts");

    for uri in ["/export-all-data?userId=u1", "/export-summary?userId=u1"] {
        let response = app.call(get(uri)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "database_error");
        assert!(body["details"].is_string());
    }
}
