//! Import reconciler: merges an exported template collection into local
//! storage.
//!
//! Records are matched by id. Existing records are resolved by the policy the
//! caller picks; nothing is ever deleted. The whole batch runs inside one
//! transaction, so a failure on any record leaves the store untouched.

mod incoming;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{TemplateStore, Transactional};
use crate::error::Result;
use crate::export::ExportPayload;
use crate::util::now_millis;

use incoming::{effective_timestamp, incoming_id, IncomingTemplate};

/// How an incoming record that already exists locally is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Newer timestamp wins; equal timestamps are left alone
    TimestampWins,
    /// Incoming always overwrites and is stamped with the import time
    MergeOverwrite,
}

impl ReconcilePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimestampWins => "timestamp-wins",
            Self::MergeOverwrite => "merge-overwrite",
        }
    }
}

/// Caller-selected import configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub policy: ReconcilePolicy,
    /// Accepted for forward compatibility; settings are never applied
    pub import_settings: bool,
}

impl ImportOptions {
    #[must_use]
    pub const fn new(policy: ReconcilePolicy) -> Self {
        Self {
            policy,
            import_settings: false,
        }
    }

    #[must_use]
    pub const fn with_import_settings(mut self, import_settings: bool) -> Self {
        self.import_settings = import_settings;
        self
    }
}

/// Per-outcome record counts of one import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub kept_local: usize,
    pub skipped: usize,
}

impl ImportSummary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.inserted + self.updated + self.kept_local + self.skipped
    }
}

/// Outcome for a single incoming record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Inserted,
    Updated,
    KeptLocal,
    Skipped,
}

impl ImportSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Inserted => self.inserted += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::KeptLocal => self.kept_local += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// Validate `payload` and merge its templates into `store`.
///
/// Fails with `Error::InvalidPayload` before opening a transaction when the
/// envelope is malformed.
pub fn reconcile<S: Transactional>(
    store: &mut S,
    payload: &Value,
    options: ImportOptions,
) -> Result<ImportSummary> {
    reconcile_at(store, payload, options, now_millis())
}

/// [`reconcile`] with an explicit clock, in Unix ms.
pub fn reconcile_at<S: Transactional>(
    store: &mut S,
    payload: &Value,
    options: ImportOptions,
    now: i64,
) -> Result<ImportSummary> {
    let payload = ExportPayload::from_value(payload)?;
    tracing::debug!(
        "Reconciling {} templates exported at {} ({})",
        payload.templates.len(),
        payload.exported_at,
        options.policy.as_str()
    );

    let result = store.transaction(|tx| {
        let mut summary = ImportSummary::default();
        for record in &payload.templates {
            summary.record(reconcile_record(tx, record, options.policy, now)?);
        }

        if options.import_settings && payload.settings.is_some() {
            tracing::info!("Payload carries settings; settings import is not supported, ignoring");
        }

        Ok(summary)
    });

    match &result {
        Ok(summary) => tracing::info!(
            "Imported templates: {} inserted, {} updated, {} kept local, {} skipped",
            summary.inserted,
            summary.updated,
            summary.kept_local,
            summary.skipped
        ),
        Err(error) => tracing::warn!("Template import rolled back: {error}"),
    }

    result
}

fn reconcile_record(
    store: &dyn TemplateStore,
    record: &Value,
    policy: ReconcilePolicy,
    now: i64,
) -> Result<Outcome> {
    let Some(id) = incoming_id(record) else {
        tracing::debug!("Skipping template record without a usable id");
        return Ok(Outcome::Skipped);
    };

    let incoming = IncomingTemplate::parse(id, record)?;

    let Some(existing) = store.get(&incoming.id)? else {
        let template = incoming.into_new(policy, now)?;
        store.add(&template)?;
        tracing::debug!("Inserted template {}", template.id);
        return Ok(Outcome::Inserted);
    };

    match policy {
        ReconcilePolicy::TimestampWins => {
            let local_ts = effective_timestamp(Some(existing.updated_at), Some(existing.created_at));
            let incoming_ts = incoming.effective_timestamp();

            if incoming_ts > local_ts {
                let merged = incoming.merge_onto(existing, policy, now)?;
                store.put(&merged)?;
                tracing::debug!("Updated template {} ({local_ts} -> {incoming_ts})", merged.id);
                Ok(Outcome::Updated)
            } else if local_ts > incoming_ts {
                tracing::debug!("Kept local template {} ({local_ts} > {incoming_ts})", existing.id);
                Ok(Outcome::KeptLocal)
            } else {
                tracing::debug!("Skipped template {} (same timestamp {local_ts})", existing.id);
                Ok(Outcome::Skipped)
            }
        }
        ReconcilePolicy::MergeOverwrite => {
            let merged = incoming.merge_onto(existing, policy, now)?;
            store.put(&merged)?;
            tracing::debug!("Overwrote template {}", merged.id);
            Ok(Outcome::Updated)
        }
    }
}
