// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Name and target normalization relative to a zone.
//!
//! The provider stores hosts relative to their zone and may store in-zone alias
//! targets as bare labels, while the orchestrator speaks fully-qualified names.
//! These helpers convert between the two so comparisons are insensitive to
//! representational differences.

use crate::constants::{APEX_HOST, REGISTRY_APEX_HOST, REGISTRY_APEX_PREFIX, TXT_TRIM_CHARS};
use crate::types::RecordType;

/// Canonicalize an alias (CNAME) target relative to `zone_name`.
///
/// In order:
/// 1. `www.zone.` becomes `www`
/// 2. `www.zone` becomes `www`
/// 3. a name without trailing dot is external and gains one
/// 4. anything else is already a fully-qualified external name
///
/// # Example
///
/// ```rust
/// use cloudns_sync::names::normalize_alias_target;
///
/// assert_eq!(normalize_alias_target("alpha.com", "www.alpha.com"), "www");
/// assert_eq!(normalize_alias_target("alpha.com", "www.beta.com"), "www.beta.com.");
/// ```
#[must_use]
pub fn normalize_alias_target(zone_name: &str, target: &str) -> String {
    let in_zone = format!(".{zone_name}");
    let in_zone_fqdn = format!("{in_zone}.");

    if let Some(host) = target.strip_suffix(&in_zone_fqdn) {
        host.to_string()
    } else if let Some(host) = target.strip_suffix(&in_zone) {
        host.to_string()
    } else if !target.ends_with('.') {
        format!("{target}.")
    } else {
        target.to_string()
    }
}

/// Strip surrounding quotes and backslashes from a TXT target.
///
/// Registry TXT targets arrive quoted, while the provider stores them bare.
#[must_use]
pub fn unquote_txt_target(target: &str) -> &str {
    target.trim_matches(&TXT_TRIM_CHARS[..])
}

/// Normalize `target` into the form the provider stores for `record_type`.
///
/// Alias targets are normalized relative to the zone and TXT targets are
/// unquoted. Every other type is returned verbatim.
#[must_use]
pub fn comparable_target(zone_name: &str, record_type: &RecordType, target: &str) -> String {
    if record_type.is_alias() {
        normalize_alias_target(zone_name, target)
    } else if *record_type == RecordType::TXT {
        unquote_txt_target(target).to_string()
    } else {
        target.to_string()
    }
}

/// Host label of `dns_name` relative to `zone_name`.
///
/// The apex maps to `@`. The apex registry name `a-example.com` maps to
/// `adash`, since the provider rejects hosts ending in `-`.
#[must_use]
pub fn relative_host(zone_name: &str, dns_name: &str) -> String {
    let dns_name = dns_name.trim_end_matches('.');

    if dns_name == zone_name {
        return APEX_HOST.to_string();
    }
    if let Some(host) = dns_name.strip_suffix(&format!(".{zone_name}")) {
        return host.to_string();
    }
    if dns_name.strip_prefix(REGISTRY_APEX_PREFIX) == Some(zone_name) {
        return REGISTRY_APEX_HOST.to_string();
    }
    dns_name.to_string()
}

/// Fully-qualified DNS name of a record `host` in `zone_name`.
///
/// Inverse of [`relative_host`]. Only the TXT host `adash` maps back to the
/// apex registry name; any other host is qualified with the zone.
#[must_use]
pub fn fqdn_for_host(zone_name: &str, host: &str, record_type: &RecordType) -> String {
    if is_apex_host(host) {
        return zone_name.to_string();
    }
    if *record_type == RecordType::TXT && host == REGISTRY_APEX_HOST {
        return format!("{REGISTRY_APEX_PREFIX}{zone_name}");
    }
    format!("{host}.{zone_name}")
}

/// Returns true when `host` denotes the zone apex (empty or `@`).
#[must_use]
pub fn is_apex_host(host: &str) -> bool {
    host.is_empty() || host == APEX_HOST
}

/// Returns true when `host` denotes the same label as `wanted`, treating
/// empty and `@` as the apex.
#[must_use]
pub fn hosts_equal(host: &str, wanted: &str) -> bool {
    if is_apex_host(host) || is_apex_host(wanted) {
        return is_apex_host(host) && is_apex_host(wanted);
    }
    host == wanted
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod names_tests;
