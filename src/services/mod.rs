// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod events;
pub mod export;
pub mod firebase_auth;
pub mod notification;
pub mod profile;
pub mod push;
pub mod sync;

pub use events::{Effect, EventRouter, TriggerEvent, TriggerKind};
pub use export::Exporter;
pub use firebase_auth::{FirebaseTokenVerifier, IdentityError};
pub use notification::{DispatchReport, Notifier};
pub use profile::ProfileStore;
pub use push::{FcmGateway, LogGateway, NotificationError, PushGateway, PushNotification};
pub use sync::SyncTracker;
