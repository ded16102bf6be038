// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push gateways: deliver one notification to one device token.
//!
//! - [`FcmGateway`] sends through the FCM HTTP v1 API.
//! - [`LogGateway`] only logs (local development).

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const FCM_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

/// Delivery failures. Never surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// The token is no longer registered with the push service.
    #[error("Token is no longer registered")]
    Unregistered,

    #[error("Push service rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Push service authentication failed: {0}")]
    Auth(String),

    #[error("Push transport error: {0}")]
    Transport(String),
}

/// Sends a single message to a single token.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(
        &self,
        token: &str,
        notification: &PushNotification,
    ) -> Result<(), NotificationError>;
}

/// FCM HTTP v1 gateway.
pub struct FcmGateway {
    http_client: reqwest::Client,
    endpoint: String,
    auth: gcloud_sdk::GoogleAuthTokenGenerator,
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: &'a PushNotification,
}

impl FcmGateway {
    /// Create a gateway using application default credentials.
    pub async fn new(project_id: &str) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(FCM_HTTP_TIMEOUT)
            .build()
            .context("failed building FCM HTTP client")?;

        let auth = gcloud_sdk::GoogleAuthTokenGenerator::new(
            gcloud_sdk::TokenSourceType::Default,
            vec![FCM_SCOPE.to_string()],
        )
        .await
        .context("failed initializing FCM credentials")?;

        let endpoint = format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            project_id
        );

        tracing::info!(endpoint = %endpoint, "Initialized FCM gateway");

        Ok(Self {
            http_client,
            endpoint,
            auth,
        })
    }
}

#[async_trait]
impl PushGateway for FcmGateway {
    async fn send(
        &self,
        token: &str,
        notification: &PushNotification,
    ) -> Result<(), NotificationError> {
        let access_token = self
            .auth
            .create_token()
            .await
            .map_err(|e| NotificationError::Auth(e.to_string()))?;

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, access_token.header_value())
            .json(&FcmRequest {
                message: FcmMessage {
                    token,
                    notification,
                },
            })
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status.as_u16(), body))
    }
}

/// Map an FCM error response to a [`NotificationError`].
fn classify_failure(status: u16, body: String) -> NotificationError {
    if status == 404 || body.contains("UNREGISTERED") {
        NotificationError::Unregistered
    } else {
        NotificationError::Rejected { status, body }
    }
}

/// Gateway that logs instead of sending.
#[derive(Default)]
pub struct LogGateway;

#[async_trait]
impl PushGateway for LogGateway {
    async fn send(
        &self,
        token: &str,
        notification: &PushNotification,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            token_suffix = %token_suffix(token),
            title = %notification.title,
            body = %notification.body,
            "Push disabled; notification logged only"
        );
        Ok(())
    }
}

/// Last few characters of a token, for logs.
pub(crate) fn token_suffix(token: &str) -> &str {
    let start = token
        .char_indices()
        .rev()
        .nth(5)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &token[start..]
}
