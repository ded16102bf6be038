// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event router for record triggers.
//!
//! Each trigger (created / updated / deleted on a record collection) maps to
//! a fixed list of effects via [`plan`]. Effects run in order: the sync
//! metadata write first, then any notification. Every effect is best effort;
//! failures are logged and the event still completes.

use crate::models::{Record, RecordCollection, SyncAction, UserId};
use crate::services::notification::{DispatchReport, Notifier};
use crate::services::sync::SyncTracker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of document change that fired the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Created,
    Updated,
    Deleted,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Created => "created",
            TriggerKind::Updated => "updated",
            TriggerKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(TriggerKind::Created),
            "updated" => Ok(TriggerKind::Updated),
            "deleted" => Ok(TriggerKind::Deleted),
            other => Err(format!("Unknown trigger kind: {}", other)),
        }
    }
}

/// One reaction to a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Upsert the user's sync metadata cell.
    RecordAction { action: SyncAction },
    /// Send a sync notice to every registered token.
    SyncNotice { message: String },
    /// Warn if the record is about to expire.
    ExpiryCheck,
}

/// A delivered trigger.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub kind: TriggerKind,
    pub collection: RecordCollection,
    pub user_id: UserId,
    pub document_id: Option<String>,
    pub record: Record,
}

/// Map a trigger to its effects.
///
/// The match is exhaustive over (kind, collection), so adding a collection
/// forces a decision here.
pub fn plan(kind: TriggerKind, collection: RecordCollection, record: &Record) -> Vec<Effect> {
    use RecordCollection::*;
    use TriggerKind::*;

    match (kind, collection) {
        (Created, Receipts) => vec![
            Effect::RecordAction {
                action: SyncAction::ReceiptCreated,
            },
            Effect::SyncNotice {
                message: format!("Receipt '{}' synced to cloud!", record.title_or_unknown()),
            },
        ],
        (Created, Warranties) => vec![
            Effect::RecordAction {
                action: SyncAction::WarrantyCreated,
            },
            Effect::SyncNotice {
                message: format!("Warranty '{}' synced to cloud!", record.title_or_unknown()),
            },
        ],
        (Created, Categories) => vec![Effect::RecordAction {
            action: SyncAction::CategoryCreated,
        }],
        (Updated, Warranties) => {
            let mut effects = vec![Effect::RecordAction {
                action: SyncAction::WarrantyUpdated,
            }];
            if record.has_expiry() {
                effects.push(Effect::ExpiryCheck);
            }
            effects
        }
        (Deleted, Receipts) => vec![Effect::RecordAction {
            action: SyncAction::ReceiptDeleted,
        }],
        (Deleted, Warranties) => vec![Effect::RecordAction {
            action: SyncAction::WarrantyDeleted,
        }],
        (Updated, Receipts) | (Updated, Categories) | (Deleted, Categories) => vec![],
    }
}

/// Result of running one effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectOutcome {
    pub effect: Effect,
    /// False if the effect failed (already logged).
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchReport>,
}

/// Runs planned effects against the sync tracker and notifier.
#[derive(Clone)]
pub struct EventRouter {
    sync: SyncTracker,
    notifier: Notifier,
}

impl EventRouter {
    pub fn new(sync: SyncTracker, notifier: Notifier) -> Self {
        Self { sync, notifier }
    }

    /// Apply every effect for the event. Never fails.
    pub async fn handle(&self, event: &TriggerEvent) -> Vec<EffectOutcome> {
        let effects = plan(event.kind, event.collection, &event.record);

        tracing::info!(
            user_id = %event.user_id,
            collection = %event.collection,
            kind = %event.kind,
            document_id = event.document_id.as_deref().unwrap_or(""),
            effects = effects.len(),
            "Handling record trigger"
        );

        let mut outcomes = Vec::with_capacity(effects.len());
        for effect in effects {
            let outcome = self.apply(event, effect).await;
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn apply(&self, event: &TriggerEvent, effect: Effect) -> EffectOutcome {
        match &effect {
            Effect::RecordAction { action } => {
                let ok = match self.sync.record_action(&event.user_id, *action).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(
                            user_id = %event.user_id,
                            action = %action,
                            error = %e,
                            "Failed to update sync metadata"
                        );
                        false
                    }
                };
                EffectOutcome {
                    effect,
                    ok,
                    dispatch: None,
                }
            }
            Effect::SyncNotice { message } => {
                let report = self.notifier.dispatch(&event.user_id, message).await;
                EffectOutcome {
                    effect,
                    ok: true,
                    dispatch: Some(report),
                }
            }
            Effect::ExpiryCheck => {
                let report = self
                    .notifier
                    .maybe_dispatch_expiry_warning(&event.user_id, &event.record)
                    .await;
                EffectOutcome {
                    effect,
                    ok: true,
                    dispatch: report,
                }
            }
        }
    }
}
