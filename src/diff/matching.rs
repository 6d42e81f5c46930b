// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Matching predicates between desired endpoints and existing records.

use crate::names::{comparable_target, hosts_equal, relative_host};
use crate::types::{Endpoint, Record, RecordDraft, Targets, Zone};

/// Existing records sitting at the endpoint's host with the endpoint's type.
#[must_use]
pub fn matching_domain_records<'a>(
    records: &'a [Record],
    zone_name: &str,
    endpoint: &Endpoint,
) -> Vec<&'a Record> {
    let host = relative_host(zone_name, &endpoint.dns_name);
    records
        .iter()
        .filter(|r| r.record_type == endpoint.record_type && hosts_equal(&r.host, &host))
        .collect()
}

/// Returns true when `record` holds `target` of the endpoint's type.
///
/// Alias targets are compared after normalization and TXT targets after
/// unquoting. Every other type compares the raw target verbatim.
#[must_use]
pub fn target_matches(record: &Record, zone_name: &str, endpoint: &Endpoint, target: &str) -> bool {
    record.record_type == endpoint.record_type
        && comparable_target(zone_name, &endpoint.record_type, target) == record.value
}

/// Returns true when `record` holds any of the endpoint's targets.
#[must_use]
pub fn targets_match(record: &Record, zone_name: &str, endpoint: &Endpoint) -> bool {
    endpoint
        .targets
        .iter()
        .any(|t| target_matches(record, zone_name, endpoint, t))
}

/// The endpoint's targets in the form stored by the provider, deduplicated.
///
/// `www.alpha.com` and `www.alpha.com.` collapse into one alias target `www`.
#[must_use]
pub fn normalized_targets(zone_name: &str, endpoint: &Endpoint) -> Targets {
    endpoint
        .targets
        .iter()
        .map(|t| comparable_target(zone_name, &endpoint.record_type, t))
        .collect()
}

/// Record fields for one normalized `target` of `endpoint` in `zone`.
#[must_use]
pub fn desired_draft(zone: &Zone, endpoint: &Endpoint, target: &str) -> RecordDraft {
    RecordDraft {
        host: relative_host(&zone.name, &endpoint.dns_name),
        record_type: endpoint.record_type.clone(),
        value: target.to_string(),
        ttl: endpoint.configured_ttl(),
    }
}

/// Returns true when writing `desired` over `existing` would change anything.
///
/// TTLs are compared after substituting `default_ttl` for absent values.
#[must_use]
pub fn needs_update(existing: &Record, desired: &RecordDraft, default_ttl: u32) -> bool {
    existing.record_type != desired.record_type
        || !hosts_equal(&existing.host, &desired.host)
        || existing.value != desired.value
        || existing.ttl.unwrap_or(default_ttl) != desired.ttl.unwrap_or(default_ttl)
}

#[cfg(test)]
#[path = "matching_tests.rs"]
mod matching_tests;
