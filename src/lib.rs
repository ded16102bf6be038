// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Warranty-Tracker: backend for a receipt and warranty tracking app
//!
//! This crate provides the HTTP handlers and record triggers behind the
//! mobile app: profile storage, sync status, push notifications, and data
//! export, all scoped per user.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::{
    EventRouter, Exporter, FirebaseTokenVerifier, Notifier, ProfileStore, PushGateway,
    SyncTracker,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub profiles: ProfileStore,
    pub sync: SyncTracker,
    pub notifier: Notifier,
    pub exporter: Exporter,
    pub events: EventRouter,
    pub identity_verifier: Arc<FirebaseTokenVerifier>,
}

impl AppState {
    /// Wire every service over one document store and push gateway.
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        gateway: Arc<dyn PushGateway>,
        identity_verifier: Arc<FirebaseTokenVerifier>,
    ) -> Self {
        let profiles = ProfileStore::new(store.clone());
        let sync = SyncTracker::new(store.clone());
        let notifier = Notifier::new(store.clone(), gateway, config.notification_title.clone());
        let exporter = Exporter::new(store);
        let events = EventRouter::new(sync.clone(), notifier.clone());

        Self {
            config,
            profiles,
            sync,
            notifier,
            exporter,
            events,
            identity_verifier,
        }
    }
}
