// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! File-backed [`DnsApi`] implementation.
//!
//! Provider state lives in a YAML or JSON document (format chosen by file
//! extension, `.json` for JSON and anything else for YAML):
//!
//! ```yaml
//! zones:
//!   - id: "alpha.com"
//!     name: alpha.com
//!     active: true
//!     records:
//!       - { id: "1", host: www, type: A, value: 1.1.1.1, ttl: 3600 }
//! ```
//!
//! Mutations are kept in memory until [`SnapshotDnsApi::save`] writes the
//! document back. Newly created records get the next free numeric identifier.

use crate::api::DnsApi;
use crate::constants::{
    ACTION_CREATE_RECORD, ACTION_DELETE_RECORD, ACTION_GET_RECORDS, ACTION_GET_ZONES,
    ACTION_UPDATE_RECORD,
};
use crate::errors::ProviderError;
use crate::types::{Record, RecordId, RecordPayload, RecordType, Zone};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredRecord {
    id: RecordId,
    host: String,
    #[serde(rename = "type")]
    record_type: RecordType,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
}

impl StoredRecord {
    fn to_record(&self, zone_id: &str) -> Record {
        Record {
            id: self.id.clone(),
            zone_id: zone_id.to_string(),
            host: self.host.clone(),
            record_type: self.record_type.clone(),
            value: self.value.clone(),
            ttl: self.ttl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredZone {
    #[serde(flatten)]
    zone: Zone,
    #[serde(default)]
    records: Vec<StoredRecord>,
}

/// Serialized provider state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotState {
    #[serde(default)]
    zones: Vec<StoredZone>,
}

impl SnapshotState {
    fn zone_mut(&mut self, zone_id: &str) -> Result<&mut StoredZone, ProviderError> {
        self.zones
            .iter_mut()
            .find(|z| z.zone.id == zone_id)
            .ok_or_else(|| ProviderError::ZoneNotFound {
                zone: zone_id.to_string(),
            })
    }

    fn next_id(&self) -> u64 {
        self.zones
            .iter()
            .flat_map(|z| &z.records)
            .filter_map(|r| r.id.as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

fn check_cancelled(cancel: &CancellationToken, action: &str) -> Result<(), ProviderError> {
    if cancel.is_cancelled() {
        return Err(ProviderError::Cancelled {
            action: action.to_string(),
        });
    }
    Ok(())
}

/// [`DnsApi`] over a state file, for offline planning and tests.
#[derive(Debug)]
pub struct SnapshotDnsApi {
    path: PathBuf,
    state: Mutex<SnapshotState>,
}

impl SnapshotDnsApi {
    /// Load the state file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Storage`] if the file cannot be read or parsed.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, ProviderError> {
        let path = path.into();
        let storage = |reason: String| ProviderError::Storage {
            path: path.display().to_string(),
            reason,
        };

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| storage(e.to_string()))?;
        let state: SnapshotState = match Format::for_path(&path) {
            Format::Json => serde_json::from_str(&raw).map_err(|e| storage(e.to_string()))?,
            Format::Yaml => serde_yaml::from_str(&raw).map_err(|e| storage(e.to_string()))?,
        };

        debug!(
            path = %path.display(),
            zones = state.zones.len(),
            "Loaded provider state"
        );
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Write the current state back to the file it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Storage`] if the state cannot be encoded or written.
    pub async fn save(&self) -> Result<(), ProviderError> {
        let storage = |reason: String| ProviderError::Storage {
            path: self.path.display().to_string(),
            reason,
        };

        let state = self.state.lock().await;
        let encoded = match Format::for_path(&self.path) {
            Format::Json => serde_json::to_string_pretty(&*state).map_err(|e| storage(e.to_string()))?,
            Format::Yaml => serde_yaml::to_string(&*state).map_err(|e| storage(e.to_string()))?,
        };
        tokio::fs::write(&self.path, encoded)
            .await
            .map_err(|e| storage(e.to_string()))?;

        debug!(path = %self.path.display(), "Saved provider state");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records of `zone_id` as currently held in memory.
    pub async fn stored_records(&self, zone_id: &str) -> Vec<Record> {
        let state = self.state.lock().await;
        state
            .zones
            .iter()
            .find(|z| z.zone.id == zone_id)
            .map(|z| z.records.iter().map(|r| r.to_record(zone_id)).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DnsApi for SnapshotDnsApi {
    async fn list_zones(&self, cancel: &CancellationToken) -> Result<Vec<Zone>, ProviderError> {
        check_cancelled(cancel, ACTION_GET_ZONES)?;
        let state = self.state.lock().await;
        Ok(state.zones.iter().map(|z| z.zone.clone()).collect())
    }

    async fn list_records(
        &self,
        zone: &Zone,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, ProviderError> {
        check_cancelled(cancel, ACTION_GET_RECORDS)?;
        let mut state = self.state.lock().await;
        let stored = state.zone_mut(&zone.id)?;
        Ok(stored.records.iter().map(|r| r.to_record(&zone.id)).collect())
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &RecordPayload,
        cancel: &CancellationToken,
    ) -> Result<Record, ProviderError> {
        check_cancelled(cancel, ACTION_CREATE_RECORD)?;
        let mut state = self.state.lock().await;
        let id = RecordId::new(state.next_id().to_string());
        let stored = StoredRecord {
            id,
            host: record.host.clone(),
            record_type: record.record_type.clone(),
            value: record.value.clone(),
            ttl: Some(record.ttl),
        };
        let created = stored.to_record(zone_id);
        state.zone_mut(zone_id)?.records.push(stored);
        Ok(created)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        id: &RecordId,
        record: &RecordPayload,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        check_cancelled(cancel, ACTION_UPDATE_RECORD)?;
        let mut state = self.state.lock().await;
        let stored = state
            .zone_mut(zone_id)?
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| ProviderError::RecordNotFound {
                zone: zone_id.to_string(),
                id: id.to_string(),
            })?;

        stored.host = record.host.clone();
        stored.record_type = record.record_type.clone();
        stored.value = record.value.clone();
        stored.ttl = Some(record.ttl);
        Ok(())
    }

    async fn delete_record(
        &self,
        zone_id: &str,
        id: &RecordId,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        check_cancelled(cancel, ACTION_DELETE_RECORD)?;
        let mut state = self.state.lock().await;
        let records = &mut state.zone_mut(zone_id)?.records;
        let position = records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| ProviderError::RecordNotFound {
                zone: zone_id.to_string(),
                id: id.to_string(),
            })?;
        records.remove(position);
        Ok(())
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
