// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Warranty-Tracker API Server
//!
//! Serves the receipt/warranty app's request endpoints and the record
//! trigger endpoint.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warranty_tracker::{
    config::{Config, StoreBackend},
    db::{DocumentStore, FirestoreStore, MemoryStore},
    services::{FcmGateway, FirebaseTokenVerifier, LogGateway, PushGateway},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Warranty-Tracker API");

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(&config.gcp_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    let gateway: Arc<dyn PushGateway> = if config.push_enabled {
        Arc::new(FcmGateway::new(&config.firebase_project_id).await?)
    } else {
        tracing::info!("Push disabled; notifications will be logged only");
        Arc::new(LogGateway)
    };

    let identity_verifier = Arc::new(FirebaseTokenVerifier::new(&config)?);

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        store,
        gateway,
        identity_verifier,
    ));

    // Build router
    let app = warranty_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,warranty_tracker=debug"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
