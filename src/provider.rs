// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation entry points: record export and change application.
//!
//! [`CloudnsProvider`] ties the pieces together for one pass:
//!
//! 1. list zones, dropping inactive ones and those rejected by the domain filter
//! 2. fetch the records of every remaining zone into a [`RecordSnapshot`]
//! 3. partition the plan's endpoints by owning zone
//! 4. diff the batches against the snapshot into a [`ChangeSet`]
//! 5. run the [`ApplyPipeline`] once
//!
//! Provider state is fetched fresh for every pass and never cached between passes.

use crate::api::{observed_call, DnsApi};
use crate::apply::{ApplyPipeline, ApplyReport};
use crate::changes::ChangeSet;
use crate::config::Configuration;
use crate::constants::{ACTION_GET_RECORDS, ACTION_GET_ZONES};
use crate::diff::{diff, DesiredBatches};
use crate::errors::{ProviderError, ReconcileError};
use crate::index::RecordSnapshot;
use crate::metrics::ApiMetrics;
use crate::names::fqdn_for_host;
use crate::types::{Changes, Endpoint, RecordType, Zone};
use crate::zones::partition_by_zone;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Merge endpoints sharing DNS name and record type into one multi-target endpoint.
///
/// The first endpoint of each group keeps its position and TTL; targets are
/// appended in first-seen order without duplicates.
#[must_use]
pub fn merge_endpoints_by_name_type(endpoints: Vec<Endpoint>) -> Vec<Endpoint> {
    let mut merged: Vec<Endpoint> = Vec::with_capacity(endpoints.len());
    let mut positions: HashMap<(String, RecordType), usize> = HashMap::new();

    for endpoint in endpoints {
        let key = (endpoint.dns_name.clone(), endpoint.record_type.clone());
        match positions.get(&key) {
            Some(&i) => {
                for target in &endpoint.targets {
                    merged[i].targets.push(target.clone());
                }
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(endpoint);
            }
        }
    }

    merged
}

/// DNS provider bound to one API client, metrics sink and configuration.
#[derive(Clone)]
pub struct CloudnsProvider {
    api: Arc<dyn DnsApi>,
    metrics: Arc<dyn ApiMetrics>,
    config: Configuration,
}

impl CloudnsProvider {
    #[must_use]
    pub fn new(api: Arc<dyn DnsApi>, metrics: Arc<dyn ApiMetrics>, config: Configuration) -> Self {
        Self {
            api,
            metrics,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Zones managed by this provider.
    ///
    /// # Errors
    ///
    /// Returns the provider error if listing zones fails.
    pub async fn zones(&self, cancel: &CancellationToken) -> Result<Vec<Zone>, ProviderError> {
        let zones = observed_call(
            self.metrics.as_ref(),
            cancel,
            ACTION_GET_ZONES,
            self.api.list_zones(cancel),
        )
        .await?;

        let mut managed = Vec::with_capacity(zones.len());
        let mut filtered_out = 0;
        for zone in zones {
            if !zone.active {
                debug!(zone = %zone.name, "Skipping inactive zone");
            } else if self.config.domain_filter.matches(&zone.name) {
                managed.push(zone);
            } else {
                filtered_out += 1;
            }
        }
        self.metrics.set_filtered_out_zones(filtered_out);

        debug!(zones = managed.len(), filtered_out, "Listed zones");
        Ok(managed)
    }

    /// Fetch the current records of every zone in `zones`.
    ///
    /// # Errors
    ///
    /// Returns the provider error of the first zone whose records cannot be listed.
    pub async fn snapshot(
        &self,
        zones: &[Zone],
        cancel: &CancellationToken,
    ) -> Result<RecordSnapshot, ProviderError> {
        let mut snapshot = RecordSnapshot::new();
        for zone in zones {
            let records = observed_call(
                self.metrics.as_ref(),
                cancel,
                ACTION_GET_RECORDS,
                self.api.list_records(zone, cancel),
            )
            .await?;
            snapshot.insert_zone(zone.clone(), records);
        }
        Ok(snapshot)
    }

    /// Export the managed records as endpoints, merged by name and type.
    ///
    /// # Errors
    ///
    /// Returns the provider error if zones or records cannot be listed.
    pub async fn records(&self, cancel: &CancellationToken) -> Result<Vec<Endpoint>, ProviderError> {
        info!("Getting records from ClouDNS");

        let zones = self.zones(cancel).await?;
        let snapshot = self.snapshot(&zones, cancel).await?;

        let mut endpoints = Vec::with_capacity(snapshot.record_count());
        for zone in &zones {
            let mut skipped = 0;
            for record in snapshot.records(&zone.id) {
                if !record.record_type.is_supported() {
                    skipped += 1;
                    continue;
                }
                let name = fqdn_for_host(&zone.name, &record.host, &record.record_type);
                let endpoint = Endpoint::new(name, record.record_type.clone(), [record.value.clone()]);
                endpoints.push(endpoint.with_ttl(record.ttl.unwrap_or(0)));
            }
            self.metrics.set_skipped_records(&zone.name, skipped);
        }

        let merged = merge_endpoints_by_name_type(endpoints);
        for endpoint in merged.iter().filter(|e| e.record_type != RecordType::TXT) {
            debug!(
                dns_name = %endpoint.dns_name,
                record_type = %endpoint.record_type,
                targets = ?endpoint.targets,
                ttl = endpoint.ttl,
                "Found endpoint"
            );
        }
        Ok(merged)
    }

    /// Compute the change set for `changes` against fresh provider state.
    ///
    /// # Errors
    ///
    /// Returns the provider error if zones or records cannot be listed.
    pub async fn plan(
        &self,
        changes: &Changes,
        cancel: &CancellationToken,
    ) -> Result<ChangeSet, ProviderError> {
        let mut change_set = ChangeSet::new(self.config.dry_run, self.config.default_ttl);
        if changes.is_empty() {
            return Ok(change_set);
        }

        let zones = self.zones(cancel).await?;
        let snapshot = self.snapshot(&zones, cancel).await?;

        for endpoint in &changes.update_old {
            debug!(
                dns_name = %endpoint.dns_name,
                record_type = %endpoint.record_type,
                targets = ?endpoint.targets,
                "Previous state of updated endpoint"
            );
        }

        let batches = DesiredBatches {
            creates: partition_by_zone(&changes.create, &zones),
            updates: partition_by_zone(&changes.update_new, &zones),
            deletes: partition_by_zone(&changes.delete, &zones),
        };
        diff(&snapshot, &batches, &mut change_set);
        Ok(change_set)
    }

    /// Run one full reconciliation pass for `changes`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Snapshot`] if provider state cannot be fetched,
    /// or [`ReconcileError::Apply`] for the first failing operation.
    pub async fn apply_changes(
        &self,
        changes: &Changes,
        cancel: &CancellationToken,
    ) -> Result<ApplyReport, ReconcileError> {
        if changes.is_empty() {
            info!("No changes");
            return Ok(ApplyReport::default());
        }

        let prefix = if self.config.dry_run { "DRY RUN: " } else { "" };
        info!(
            "{prefix}Creating {} record(s), updating {} record(s), deleting {} record(s)",
            changes.create.len(),
            changes.update_new.len(),
            changes.delete.len()
        );

        let change_set = self.plan(changes, cancel).await?;
        let mut pipeline = ApplyPipeline::new(self.api.as_ref(), self.metrics.as_ref(), cancel);
        Ok(pipeline.run(change_set).await?)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
