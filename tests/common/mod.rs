// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use warranty_tracker::config::Config;
use warranty_tracker::db::MemoryStore;
use warranty_tracker::routes::create_router;
use warranty_tracker::services::{
    FirebaseTokenVerifier, NotificationError, PushGateway, PushNotification,
};
use warranty_tracker::AppState;

pub const TEST_KID: &str = "test-kid";
const TEST_PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/firebase_test_private.pem");
const TEST_PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/firebase_test_public.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Push gateway that records every send and fails on demand.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<(String, PushNotification)>>,
    rejected: Mutex<HashSet<String>>,
    unregistered: Mutex<HashSet<String>>,
}

#[allow(dead_code)]
impl RecordingGateway {
    /// Sends to `token` fail with a generic rejection.
    pub fn reject(&self, token: &str) {
        self.rejected.lock().unwrap().insert(token.to_string());
    }

    /// Sends to `token` report the token as no longer registered.
    pub fn unregister(&self, token: &str) {
        self.unregistered.lock().unwrap().insert(token.to_string());
    }

    /// Successful sends, in completion order.
    pub fn sent(&self) -> Vec<(String, PushNotification)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_bodies(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, n)| n.body).collect()
    }
}

#[async_trait]
impl PushGateway for RecordingGateway {
    async fn send(
        &self,
        token: &str,
        notification: &PushNotification,
    ) -> Result<(), NotificationError> {
        if self.unregistered.lock().unwrap().contains(token) {
            return Err(NotificationError::Unregistered);
        }
        if self.rejected.lock().unwrap().contains(token) {
            return Err(NotificationError::Rejected {
                status: 500,
                body: "injected".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), notification.clone()));
        Ok(())
    }
}

/// Everything a test needs to drive and inspect the app.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: MemoryStore,
    pub gateway: Arc<RecordingGateway>,
}

#[allow(dead_code)]
impl TestApp {
    /// Send one request through a fresh clone of the router.
    pub async fn call(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Create a test app over an in-memory store and a recording gateway.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let config = Config::test_default();
    let store = MemoryStore::new();
    let gateway = Arc::new(RecordingGateway::default());

    let verifier = FirebaseTokenVerifier::new_with_static_key(
        &config,
        TEST_KID,
        DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY).expect("test public key"),
    )
    .expect("test verifier");

    let state = Arc::new(AppState::new(
        config,
        Arc::new(store.clone()),
        gateway.clone(),
        Arc::new(verifier),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        gateway,
    }
}

#[derive(Serialize)]
struct TestClaims<'a> {
    iss: String,
    aud: &'a str,
    sub: &'a str,
    iat: u64,
    exp: u64,
    email: String,
}

/// A Firebase-style ID token for `uid`, signed with the fixture key.
#[allow(dead_code)]
pub fn create_test_id_token(config: &Config, uid: &str) -> String {
    sign_test_token(config, uid, &config.firebase_project_id, 3600)
}

/// Like [`create_test_id_token`] with explicit audience and lifetime.
#[allow(dead_code)]
pub fn sign_test_token(config: &Config, uid: &str, audience: &str, lifetime_secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let claims = TestClaims {
        iss: format!("https://securetoken.google.com/{}", config.firebase_project_id),
        aud: audience,
        sub: uid,
        iat: now - 10,
        exp: (now as i64 + lifetime_secs) as u64,
        email: format!("{uid}@example.com"),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());

    encode(
        &header,
        &claims,
        &EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY).unwrap(),
    )
    .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
