// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone matching and endpoint partitioning.
//!
//! A DNS name is owned by the most specific zone whose name is a suffix of it,
//! so nested zones (`k8s.example.com` inside `example.com`) resolve correctly.

use crate::types::{Endpoint, Zone};
use std::collections::BTreeMap;
use tracing::warn;

/// Endpoints grouped by owning zone identifier.
///
/// A `BTreeMap` keeps per-zone processing order deterministic.
pub type EndpointsByZone = BTreeMap<String, Vec<Endpoint>>;

/// Find the zone owning `domain` by longest-suffix match.
///
/// A zone matches when `domain` equals its name, ends with `.` + name, or ends
/// with `-` + name (ownership-metadata names glued onto the apex, e.g.
/// `a-example.com`). Zones are tried longest name first, so the most specific
/// zone wins.
///
/// # Example
///
/// ```rust
/// use cloudns_sync::types::Zone;
/// use cloudns_sync::zones::find_zone;
///
/// let zones = vec![Zone::new("1", "example.com"), Zone::new("2", "k8s.example.com")];
/// let zone = find_zone("dashboard.k8s.example.com", &zones).unwrap();
/// assert_eq!(zone.name, "k8s.example.com");
/// ```
#[must_use]
pub fn find_zone<'a>(domain: &str, zones: &'a [Zone]) -> Option<&'a Zone> {
    let domain = domain.trim_end_matches('.');

    let mut candidates: Vec<&Zone> = zones.iter().collect();
    candidates.sort_by(|a, b| b.name.len().cmp(&a.name.len()));

    candidates.into_iter().find(|zone| {
        let name = zone.name.as_str();
        domain == name
            || domain.ends_with(&format!(".{name}"))
            || domain.ends_with(&format!("-{name}"))
    })
}

/// Group endpoints by the identifier of their owning zone.
///
/// Endpoints without an owning zone are logged and skipped; they never fail the pass.
#[must_use]
pub fn partition_by_zone(endpoints: &[Endpoint], zones: &[Zone]) -> EndpointsByZone {
    let mut by_zone = EndpointsByZone::new();

    for endpoint in endpoints {
        match find_zone(&endpoint.dns_name, zones) {
            Some(zone) => by_zone
                .entry(zone.id.clone())
                .or_default()
                .push(endpoint.clone()),
            None => warn!(
                dns_name = %endpoint.dns_name,
                record_type = %endpoint.record_type,
                "Skipping endpoint, no matching zone found"
            ),
        }
    }

    by_zone
}

#[cfg(test)]
#[path = "zones_tests.rs"]
mod zones_tests;
