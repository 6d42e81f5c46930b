// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Apply pipeline: executes a [`ChangeSet`] against the provider.
//!
//! # Stages
//!
//! ```text
//! Idle -> DeletingRecords -> CreatingRecords -> UpdatingRecords -> Done
//! ```
//!
//! An empty change set goes straight from `Idle` to `Done`. Deletes run first so
//! a target moving between records of the same name/type never collides with
//! itself at the provider.
//!
//! Each operation is logged before the provider is called. In dry-run mode the
//! same line is prefixed with `DRY RUN:` and no call is made. The first failure
//! aborts the pipeline: nothing already applied is undone and nothing after the
//! failing operation is attempted.

use crate::api::{observed_call, DnsApi};
use crate::changes::{ChangeCreate, ChangeDelete, ChangeSet, ChangeUpdate};
use crate::constants::{
    ACTION_CREATE_RECORD, ACTION_DELETE_RECORD, ACTION_UPDATE_RECORD, VALID_TTLS_SECS,
};
use crate::errors::{ApplyError, ProviderError};
use crate::metrics::ApiMetrics;
use crate::types::{RecordPayload, RecordType};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Position of the pipeline in its fixed stage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApplyStage {
    Idle,
    DeletingRecords,
    CreatingRecords,
    UpdatingRecords,
    Done,
}

impl fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::DeletingRecords => "deleting records",
            Self::CreatingRecords => "creating records",
            Self::UpdatingRecords => "updating records",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a pipeline run that reached [`ApplyStage::Done`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub deleted: usize,
    pub created: usize,
    pub updated: usize,
    /// Operations logged but not sent because of dry-run mode
    pub skipped: usize,
}

impl ApplyReport {
    /// Operations sent to the provider.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.deleted + self.created + self.updated
    }
}

/// Check `ttl` against the values the provider accepts. TXT records are exempt.
///
/// # Errors
///
/// Returns [`ApplyError::InvalidTtl`] if the TTL is not accepted.
pub fn validate_ttl(zone_id: &str, record: &RecordPayload) -> Result<(), ApplyError> {
    if record.record_type == RecordType::TXT || VALID_TTLS_SECS.contains(&record.ttl) {
        return Ok(());
    }
    Err(ApplyError::InvalidTtl {
        zone: zone_id.to_string(),
        host: record.host.clone(),
        record_type: record.record_type.clone(),
        ttl: record.ttl,
        allowed: VALID_TTLS_SECS
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Runs one [`ChangeSet`] through the delete, create and update stages.
pub struct ApplyPipeline<'a> {
    api: &'a dyn DnsApi,
    metrics: &'a dyn ApiMetrics,
    cancel: &'a CancellationToken,
    stage: ApplyStage,
    report: ApplyReport,
}

impl<'a> ApplyPipeline<'a> {
    #[must_use]
    pub fn new(
        api: &'a dyn DnsApi,
        metrics: &'a dyn ApiMetrics,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            api,
            metrics,
            cancel,
            stage: ApplyStage::Idle,
            report: ApplyReport::default(),
        }
    }

    /// Current stage; after a failure this is the stage that failed.
    #[must_use]
    pub fn stage(&self) -> ApplyStage {
        self.stage
    }

    /// Apply `changes`, consuming them.
    ///
    /// # Errors
    ///
    /// Returns the first TTL validation or provider error; the pipeline stops there.
    pub async fn run(&mut self, changes: ChangeSet) -> Result<ApplyReport, ApplyError> {
        if changes.is_empty() {
            debug!("No changes to be applied found");
            self.transition(ApplyStage::Done);
            return Ok(self.report);
        }

        let prefix = if changes.dry_run() { "DRY RUN: " } else { "" };
        info!(
            "{prefix}Applying changes: {} delete(s), {} create(s), {} update(s)",
            changes.deletes().len(),
            changes.creates().len(),
            changes.updates().len()
        );

        self.transition(ApplyStage::DeletingRecords);
        for change in changes.deletes() {
            self.apply_delete(change, changes.dry_run()).await?;
        }

        self.transition(ApplyStage::CreatingRecords);
        for change in changes.creates() {
            self.apply_create(change, changes.dry_run(), changes.default_ttl())
                .await?;
        }

        self.transition(ApplyStage::UpdatingRecords);
        for change in changes.updates() {
            self.apply_update(change, changes.dry_run(), changes.default_ttl())
                .await?;
        }

        self.transition(ApplyStage::Done);
        info!(
            "{prefix}Changes applied: {} deleted, {} created, {} updated, {} skipped",
            self.report.deleted, self.report.created, self.report.updated, self.report.skipped
        );
        Ok(self.report)
    }

    fn transition(&mut self, next: ApplyStage) {
        debug!(from = %self.stage, to = %next, "Apply pipeline stage transition");
        self.stage = next;
    }

    async fn apply_delete(&mut self, change: &ChangeDelete, dry_run: bool) -> Result<(), ApplyError> {
        let record = &change.record;
        debug!(fields = %change.log_fields(), "Deleting domain record");
        if dry_run {
            info!(
                "DRY RUN: Deleting record [{}] of type [{}] with value [{}] from zone [{}]",
                record.host, record.record_type, record.value, change.zone_id
            );
            self.report.skipped += 1;
            return Ok(());
        }
        info!(
            "Deleting record [{}] of type [{}] with value [{}] from zone [{}]",
            record.host, record.record_type, record.value, change.zone_id
        );

        let (api, cancel) = (self.api, self.cancel);
        self.call(
            ACTION_DELETE_RECORD,
            &change.zone_id,
            &record.host,
            api.delete_record(&change.zone_id, &record.id, cancel),
        )
        .await?;
        self.report.deleted += 1;
        Ok(())
    }

    async fn apply_create(
        &mut self,
        change: &ChangeCreate,
        dry_run: bool,
        default_ttl: u32,
    ) -> Result<(), ApplyError> {
        let payload = change.record.resolve(default_ttl);
        debug!(fields = %change.log_fields(), "Creating domain record");
        validate_ttl(&change.zone_id, &payload)?;

        if dry_run {
            info!(
                "DRY RUN: Creating record [{}] of type [{}] with value [{}] and TTL [{}] in zone [{}]",
                payload.host, payload.record_type, payload.value, payload.ttl, change.zone_id
            );
            self.report.skipped += 1;
            return Ok(());
        }
        info!(
            "Creating record [{}] of type [{}] with value [{}] and TTL [{}] in zone [{}]",
            payload.host, payload.record_type, payload.value, payload.ttl, change.zone_id
        );

        let (api, cancel) = (self.api, self.cancel);
        let created = self
            .call(
                ACTION_CREATE_RECORD,
                &change.zone_id,
                &payload.host,
                api.create_record(&change.zone_id, &payload, cancel),
            )
            .await?;
        debug!(record_id = %created.id, zone = %change.zone_id, "Record created");
        self.report.created += 1;
        Ok(())
    }

    async fn apply_update(
        &mut self,
        change: &ChangeUpdate,
        dry_run: bool,
        default_ttl: u32,
    ) -> Result<(), ApplyError> {
        let payload = change.desired.resolve(default_ttl);
        debug!(fields = %change.log_fields(), "Updating domain record");
        validate_ttl(&change.zone_id, &payload)?;

        if dry_run {
            info!(
                "DRY RUN: Updating record ID [{}] with host [{}], type [{}], value [{}] and TTL [{}] in zone [{}]",
                change.existing.id, payload.host, payload.record_type, payload.value, payload.ttl, change.zone_id
            );
            self.report.skipped += 1;
            return Ok(());
        }
        info!(
            "Updating record ID [{}] with host [{}], type [{}], value [{}] and TTL [{}] in zone [{}]",
            change.existing.id, payload.host, payload.record_type, payload.value, payload.ttl, change.zone_id
        );

        let (api, cancel) = (self.api, self.cancel);
        self.call(
            ACTION_UPDATE_RECORD,
            &change.zone_id,
            &payload.host,
            api.update_record(&change.zone_id, &change.existing.id, &payload, cancel),
        )
        .await?;
        self.report.updated += 1;
        Ok(())
    }

    async fn call<T, F>(
        &self,
        action: &str,
        zone_id: &str,
        host: &str,
        request: F,
    ) -> Result<T, ApplyError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        observed_call(self.metrics, self.cancel, action, request)
            .await
            .map_err(|source| {
                error!(
                    action,
                    zone = %zone_id,
                    host = %host,
                    stage = %self.stage,
                    error = %source,
                    "Provider API call failed, aborting apply"
                );
                ApplyError::Provider {
                    stage: self.stage,
                    zone: zone_id.to_string(),
                    host: host.to_string(),
                    source,
                }
            })
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
