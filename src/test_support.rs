// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Recording stubs shared by the unit tests.

use crate::api::DnsApi;
use crate::errors::ProviderError;
use crate::metrics::ApiMetrics;
use crate::types::{Record, RecordId, RecordPayload, RecordType, Zone};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One provider call as seen by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListZones,
    ListRecords(String),
    Create { zone_id: String, payload: RecordPayload },
    Update { zone_id: String, id: String, payload: RecordPayload },
    Delete { zone_id: String, id: String },
}

impl ApiCall {
    pub fn action(&self) -> &'static str {
        match self {
            Self::ListZones => "get_zones",
            Self::ListRecords(_) => "get_records",
            Self::Create { .. } => "create_record",
            Self::Update { .. } => "update_record",
            Self::Delete { .. } => "delete_record",
        }
    }
}

/// In-memory [`DnsApi`] that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingApi {
    zones: Vec<Zone>,
    records: HashMap<String, Vec<Record>>,
    calls: Mutex<Vec<ApiCall>>,
    /// Fail the n-th call (0-based) of the named action
    fail_on: Option<(&'static str, usize)>,
    /// Never complete calls of the named action
    hang_on: Option<&'static str>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, zone: Zone, records: Vec<Record>) -> Self {
        self.records.insert(zone.id.clone(), records);
        self.zones.push(zone);
        self
    }

    pub fn failing_on(mut self, action: &'static str, nth: usize) -> Self {
        self.fail_on = Some((action, nth));
        self
    }

    pub fn hanging_on(mut self, action: &'static str) -> Self {
        self.hang_on = Some(action);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that mutate provider state, in order.
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, ApiCall::ListZones | ApiCall::ListRecords(_)))
            .collect()
    }

    async fn record(&self, call: ApiCall) -> Result<(), ProviderError> {
        let action = call.action();
        let seen = {
            let mut calls = self.calls.lock().unwrap();
            let seen = calls.iter().filter(|c| c.action() == action).count();
            calls.push(call);
            seen
        };

        if self.hang_on == Some(action) {
            std::future::pending::<()>().await;
        }
        if self.fail_on == Some((action, seen)) {
            return Err(ProviderError::ApiCallFailed {
                action: action.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DnsApi for RecordingApi {
    async fn list_zones(&self, _cancel: &CancellationToken) -> Result<Vec<Zone>, ProviderError> {
        self.record(ApiCall::ListZones).await?;
        Ok(self.zones.clone())
    }

    async fn list_records(
        &self,
        zone: &Zone,
        _cancel: &CancellationToken,
    ) -> Result<Vec<Record>, ProviderError> {
        self.record(ApiCall::ListRecords(zone.id.clone())).await?;
        Ok(self.records.get(&zone.id).cloned().unwrap_or_default())
    }

    async fn create_record(
        &self,
        zone_id: &str,
        record: &RecordPayload,
        _cancel: &CancellationToken,
    ) -> Result<Record, ProviderError> {
        self.record(ApiCall::Create {
            zone_id: zone_id.to_string(),
            payload: record.clone(),
        })
        .await?;
        Ok(Record {
            id: RecordId::new("new"),
            zone_id: zone_id.to_string(),
            host: record.host.clone(),
            record_type: record.record_type.clone(),
            value: record.value.clone(),
            ttl: Some(record.ttl),
        })
    }

    async fn update_record(
        &self,
        zone_id: &str,
        id: &RecordId,
        record: &RecordPayload,
        _cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        self.record(ApiCall::Update {
            zone_id: zone_id.to_string(),
            id: id.to_string(),
            payload: record.clone(),
        })
        .await
    }

    async fn delete_record(
        &self,
        zone_id: &str,
        id: &RecordId,
        _cancel: &CancellationToken,
    ) -> Result<(), ProviderError> {
        self.record(ApiCall::Delete {
            zone_id: zone_id.to_string(),
            id: id.to_string(),
        })
        .await
    }
}

/// [`ApiMetrics`] that keeps every sample for inspection.
#[derive(Default)]
pub struct RecordingMetrics {
    pub successes: Mutex<Vec<String>>,
    pub failures: Mutex<Vec<String>>,
    pub delays: Mutex<Vec<String>>,
    pub filtered_out_zones: Mutex<Option<usize>>,
    pub skipped_records: Mutex<HashMap<String, usize>>,
}

impl RecordingMetrics {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }

    pub fn delays(&self) -> Vec<String> {
        self.delays.lock().unwrap().clone()
    }
}

impl ApiMetrics for RecordingMetrics {
    fn inc_successful_api_calls(&self, action: &str) {
        self.successes.lock().unwrap().push(action.to_string());
    }

    fn inc_failed_api_calls(&self, action: &str) {
        self.failures.lock().unwrap().push(action.to_string());
    }

    fn observe_api_delay(&self, action: &str, _delay: Duration) {
        self.delays.lock().unwrap().push(action.to_string());
    }

    fn set_filtered_out_zones(&self, count: usize) {
        *self.filtered_out_zones.lock().unwrap() = Some(count);
    }

    fn set_skipped_records(&self, zone: &str, count: usize) {
        self.skipped_records
            .lock()
            .unwrap()
            .insert(zone.to_string(), count);
    }
}

/// A record with provider-default TTL.
pub fn record(id: &str, zone_id: &str, host: &str, record_type: RecordType, value: &str) -> Record {
    Record {
        id: RecordId::new(id),
        zone_id: zone_id.to_string(),
        host: host.to_string(),
        record_type,
        value: value.to_string(),
        ttl: None,
    }
}
