// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # cloudns-sync - DNS record reconciler for ClouDNS
//!
//! cloudns-sync converges the records held by a DNS provider to a desired set of
//! endpoints produced by an external orchestrator such as external-dns.
//!
//! ## Overview
//!
//! A reconciliation pass fetches fresh provider state, diffs it against the
//! desired endpoints and applies the smallest set of record operations that
//! closes the gap:
//!
//! - Zone matching by longest suffix
//! - Alias target normalization before comparison
//! - Target-level diffing of multi-value record sets
//! - Staged, fail-fast application (delete, then create, then update) with dry-run
//!
//! ## Modules
//!
//! - [`types`] - Zones, records, endpoints and the orchestrator's plan
//! - [`zones`] - Zone matcher and endpoint partitioning
//! - [`names`] - Alias target normalization and host/DNS name mapping
//! - [`index`] - Record snapshot and target index
//! - [`diff`] - Create, update and delete passes
//! - [`changes`] - Change set populated by the diff engine
//! - [`apply`] - Apply pipeline
//! - [`api`] - Provider API trait
//! - [`provider`] - Record export and full reconciliation passes
//! - [`snapshot`] - File-backed provider API
//! - [`domain_filter`] - Zone include/exclude filtering
//! - [`config`] - Environment configuration
//! - [`metrics`] - Provider API metrics
//!
//! ## Example
//!
//! ```rust
//! use cloudns_sync::names::normalize_alias_target;
//! use cloudns_sync::zones::find_zone;
//! use cloudns_sync::types::Zone;
//!
//! let zones = vec![Zone::new("1", "example.com"), Zone::new("2", "sub.example.com")];
//! assert_eq!(find_zone("www.sub.example.com", &zones).unwrap().id, "2");
//! assert_eq!(normalize_alias_target("alpha.com", "www.alpha.com."), "www");
//! ```

pub mod api;
pub mod apply;
pub mod changes;
pub mod config;
pub mod constants;
pub mod diff;
pub mod domain_filter;
pub mod errors;
pub mod index;
pub mod metrics;
pub mod names;
pub mod provider;
pub mod snapshot;
pub mod types;
pub mod zones;

#[cfg(test)]
mod test_support;
