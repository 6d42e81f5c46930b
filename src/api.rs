// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider record API consumed by the reconciler.
//!
//! Implementations own the transport and any timeout policy. The reconciler
//! issues calls strictly one at a time and passes a cancellation token into
//! each of them; a cancelled call should fail with
//! [`ProviderError::Cancelled`].

use crate::errors::ProviderError;
use crate::metrics::ApiMetrics;
use crate::types::{Record, RecordId, RecordPayload, Zone};
use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Zone and record operations of a DNS provider.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// List every zone visible to the account.
    async fn list_zones(&self, cancel: &CancellationToken) -> Result<Vec<Zone>, ProviderError>;

    /// List the records of one zone.
    async fn list_records(
        &self,
        zone: &Zone,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, ProviderError>;

    /// Create a record, returning it with its new identifier.
    async fn create_record(
        &self,
        zone_id: &str,
        record: &RecordPayload,
        cancel: &CancellationToken,
    ) -> Result<Record, ProviderError>;

    /// Rewrite the fields of an existing record.
    async fn update_record(
        &self,
        zone_id: &str,
        id: &RecordId,
        record: &RecordPayload,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError>;

    /// Remove an existing record.
    async fn delete_record(
        &self,
        zone_id: &str,
        id: &RecordId,
        cancel: &CancellationToken,
    ) -> Result<(), ProviderError>;
}

/// Await one provider call of `action`, racing it against `cancel`.
///
/// Success increments the success counter and records the latency; failure,
/// including cancellation, increments the failure counter only.
pub async fn observed_call<T, F>(
    metrics: &dyn ApiMetrics,
    cancel: &CancellationToken,
    action: &str,
    request: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    let start = Instant::now();
    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ProviderError::Cancelled {
            action: action.to_string(),
        }),
        result = request => result,
    };

    match &result {
        Ok(_) => {
            metrics.inc_successful_api_calls(action);
            metrics.observe_api_delay(action, start.elapsed());
        }
        Err(_) => metrics.inc_failed_api_calls(action),
    }
    result
}
