// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the reconciler.
//!
//! This module provides specialized error types for:
//! - Provider API calls (listing, creating, updating and deleting records)
//! - Apply pipeline failures, including TTL validation before a provider call
//! - A whole reconciliation pass
//! - Environment configuration
//!
//! Lookup misses during diffing (unknown zone, missing record) are not errors:
//! they are logged and the affected endpoint is skipped.

use crate::apply::ApplyStage;
use crate::types::RecordType;
use thiserror::Error;

/// Errors returned by a [`crate::api::DnsApi`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the call or could not be reached.
    #[error("Provider API call '{action}' failed: {reason}")]
    ApiCallFailed {
        /// API action name (e.g., `create_record`)
        action: String,
        /// Reason reported by the transport or the provider
        reason: String,
    },

    /// The zone referenced by a call does not exist at the provider.
    #[error("Zone '{zone}' not found at provider")]
    ZoneNotFound {
        /// The zone identifier
        zone: String,
    },

    /// The record referenced by an update or delete does not exist at the provider.
    #[error("Record '{id}' not found in zone '{zone}'")]
    RecordNotFound {
        /// The zone identifier
        zone: String,
        /// The record identifier
        id: String,
    },

    /// The call was cancelled before it completed.
    #[error("Provider API call '{action}' cancelled")]
    Cancelled {
        /// API action name
        action: String,
    },

    /// The backing state could not be read or written.
    #[error("Failed to access provider state at '{path}': {reason}")]
    Storage {
        /// Location of the state
        path: String,
        /// Underlying I/O or parse error
        reason: String,
    },
}

/// Errors that abort the apply pipeline.
///
/// Every variant is fatal to the current pass. Operations applied before the
/// failure are not rolled back; operations after it are never attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The effective TTL of a create or update is not accepted by the provider.
    #[error(
        "Invalid TTL {ttl} for {record_type} record '{host}' in zone '{zone}': must be one of {allowed}"
    )]
    InvalidTtl {
        zone: String,
        host: String,
        record_type: RecordType,
        ttl: u32,
        /// Comma-separated list of accepted TTLs
        allowed: String,
    },

    /// A provider call failed while applying a change.
    #[error("Failed during {stage} for record '{host}' in zone '{zone}': {source}")]
    Provider {
        /// Pipeline stage that was running
        stage: ApplyStage,
        zone: String,
        host: String,
        #[source]
        source: ProviderError,
    },
}

/// Errors that fail a whole reconciliation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Fetching the zone list or record snapshot failed.
    #[error("Failed to fetch provider state: {0}")]
    Snapshot(#[from] ProviderError),

    /// Applying the change set failed.
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Errors while loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be parsed.
    #[error("{key} has invalid value '{value}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
