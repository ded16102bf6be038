// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification dispatcher.
//!
//! Resolves a user's registered delivery tokens and fans a message out to
//! each of them. Delivery is best effort: every send is independent, and
//! failures are logged and counted but never returned to the caller.

use crate::db::{from_document, paths, to_document, DocumentStore, StoreError};
use crate::error::{AppError, Result};
use crate::models::{DeliveryToken, Record, UserId, VerifiedIdentity};
use crate::services::push::{token_suffix, NotificationError, PushGateway, PushNotification};
use crate::time_utils::now_rfc3339;
use futures_util::{stream, StreamExt};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Upper bound (inclusive) on days remaining for an expiry warning.
pub const EXPIRY_WARNING_DAYS: f64 = 7.0;

const MAX_CONCURRENT_SENDS: usize = 16;

/// Outcome counts for one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn DocumentStore>,
    gateway: Arc<dyn PushGateway>,
    title: String,
}

impl Notifier {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        gateway: Arc<dyn PushGateway>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            title: title.into(),
        }
    }

    /// The user's registered tokens, deduplicated.
    pub async fn resolve_tokens(&self, user_id: &UserId) -> std::result::Result<BTreeSet<String>, StoreError> {
        let collection = paths::tokens(user_id);
        let docs = self.store.list(&collection).await?;

        let mut tokens = BTreeSet::new();
        for (id, doc) in docs {
            let path = collection.doc(id);
            match from_document::<DeliveryToken>(&path, doc) {
                Ok(entry) if !entry.token.is_empty() => {
                    tokens.insert(entry.token);
                }
                Ok(_) => {
                    tracing::warn!(path = %path, "Skipping token document without a token");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable token document");
                }
            }
        }

        Ok(tokens)
    }

    /// Send `message` to every registered token of the user.
    pub async fn dispatch(&self, user_id: &UserId, message: &str) -> DispatchReport {
        let tokens = match self.resolve_tokens(user_id).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to resolve delivery tokens");
                return DispatchReport::default();
            }
        };

        if tokens.is_empty() {
            tracing::debug!(user_id = %user_id, "No delivery tokens registered");
            return DispatchReport::default();
        }

        let notification = PushNotification {
            title: self.title.clone(),
            body: message.to_string(),
        };
        let notification = &notification;

        let results: Vec<(String, std::result::Result<(), NotificationError>)> =
            stream::iter(tokens)
                .map(|token| async move {
                    let result = self.gateway.send(&token, notification).await;
                    (token, result)
                })
                .buffer_unordered(MAX_CONCURRENT_SENDS)
                .collect()
                .await;

        let mut report = DispatchReport {
            attempted: results.len(),
            ..Default::default()
        };

        for (token, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(NotificationError::Unregistered) => {
                    report.failed += 1;
                    self.prune_token(user_id, &token).await;
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        user_id = %user_id,
                        token_suffix = %token_suffix(&token),
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
        }

        tracing::info!(
            user_id = %user_id,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "Notification dispatched"
        );

        report
    }

    /// Dispatch an expiry warning if the record expires within the window.
    pub async fn maybe_dispatch_expiry_warning(
        &self,
        user_id: &UserId,
        record: &Record,
    ) -> Option<DispatchReport> {
        let message = expiry_warning_message(record)?;
        Some(self.dispatch(user_id, &message).await)
    }

    /// Add a token to the caller's set. Registering twice keeps one entry.
    pub async fn register_token(&self, identity: &VerifiedIdentity, token: &str) -> Result<()> {
        let token = require_token(token)?;
        let entry = DeliveryToken {
            token: token.to_string(),
            created_at: now_rfc3339(),
        };

        self.store
            .set(&paths::token(identity.user_id(), token), to_document(&entry)?)
            .await?;

        tracing::info!(
            user_id = %identity.user_id(),
            token_suffix = %token_suffix(token),
            "Delivery token registered"
        );
        Ok(())
    }

    /// Remove a token from the caller's set. Removing an unknown token succeeds.
    pub async fn unregister_token(&self, identity: &VerifiedIdentity, token: &str) -> Result<()> {
        let token = require_token(token)?;

        self.store
            .delete(&paths::token(identity.user_id(), token))
            .await?;

        tracing::info!(
            user_id = %identity.user_id(),
            token_suffix = %token_suffix(token),
            "Delivery token unregistered"
        );
        Ok(())
    }

    async fn prune_token(&self, user_id: &UserId, token: &str) {
        match self.store.delete(&paths::token(user_id, token)).await {
            Ok(()) => tracing::info!(
                user_id = %user_id,
                token_suffix = %token_suffix(token),
                "Pruned unregistered delivery token"
            ),
            Err(e) => tracing::warn!(
                user_id = %user_id,
                error = %e,
                "Failed to prune unregistered delivery token"
            ),
        }
    }
}

fn require_token(token: &str) -> Result<&str> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::BadRequest(
            "userId and token are required".to_string(),
        ));
    }
    Ok(token)
}

/// The warning text for a record expiring in `0 < days <= 7`, else `None`.
pub fn expiry_warning_message(record: &Record) -> Option<String> {
    let days = record.days_until_expiry?;
    if days <= 0.0 || days > EXPIRY_WARNING_DAYS {
        return None;
    }

    Some(format!(
        "Your warranty for '{}' expires in {} day(s)",
        record.title_or_unknown(),
        days
    ))
}
