// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the ClouDNS reconciler.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// TTL Constants
// ============================================================================

/// Default TTL substituted at apply time when a change carries none (1 hour)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 3600;

/// TTL values accepted by the provider for non-TXT records
pub const VALID_TTLS_SECS: [u32; 13] = [
    60, 300, 900, 1800, 3600, 21600, 43200, 86400, 172800, 259200, 604800, 1_209_600, 2_592_000,
];

// ============================================================================
// Naming Constants
// ============================================================================

/// Host label denoting the zone apex
pub const APEX_HOST: &str = "@";

/// Ownership prefix of the registry TXT record for the zone apex
pub const REGISTRY_APEX_PREFIX: &str = "a-";

/// Host storing the registry TXT record of the apex.
///
/// The provider rejects hosts ending in `-`, so `a-example.com` is stored as
/// host `adash` in zone `example.com`.
pub const REGISTRY_APEX_HOST: &str = "adash";

/// Characters stripped from both ends of TXT targets before comparison
pub const TXT_TRIM_CHARS: [char; 2] = ['\\', '"'];

// ============================================================================
// Provider API Action Names
// ============================================================================

/// Listing zones
pub const ACTION_GET_ZONES: &str = "get_zones";

/// Listing the records of one zone
pub const ACTION_GET_RECORDS: &str = "get_records";

/// Creating a record
pub const ACTION_CREATE_RECORD: &str = "create_record";

/// Updating a record
pub const ACTION_UPDATE_RECORD: &str = "update_record";

/// Deleting a record
pub const ACTION_DELETE_RECORD: &str = "delete_record";

// ============================================================================
// Metrics Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
pub const METRICS_NAMESPACE: &str = "cloudns_sync";

/// Histogram buckets for provider API latency, in seconds
pub const API_DELAY_BUCKETS_SECS: [f64; 10] = [0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];

// ============================================================================
// Configuration Environment Variables
// ============================================================================

/// Enables dry-run mode
pub const ENV_DRY_RUN: &str = "DRY_RUN";

/// Enables debug logging by default
pub const ENV_DEBUG: &str = "CLOUDNS_DEBUG";

/// Default TTL in seconds
pub const ENV_DEFAULT_TTL: &str = "DEFAULT_TTL";

/// Ownership identifier
pub const ENV_OWNER_ID: &str = "OWNER_ID";

/// Comma-separated list of domains to manage
pub const ENV_DOMAIN_FILTER: &str = "DOMAIN_FILTER";

/// Comma-separated list of domains to exclude
pub const ENV_EXCLUDE_DOMAIN_FILTER: &str = "EXCLUDE_DOMAIN_FILTER";

/// Log output format (`text` or `json`)
pub const ENV_LOG_FORMAT: &str = "RUST_LOG_FORMAT";
