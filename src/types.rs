// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Core data model shared by the diff engine, the change set and the provider.
//!
//! - [`Zone`], [`Record`] - provider-side state, read-only for the reconciler
//! - [`Endpoint`] - one desired name/type/target-set/TTL supplied by the orchestrator
//! - [`RecordDraft`] - record fields queued for creation or update
//! - [`RecordPayload`] - record fields actually sent to the provider (TTL resolved)
//! - [`Changes`] - the orchestrator's plan, in external-dns shape

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record types known to the reconciler.
///
/// Anything else is carried through verbatim as [`RecordType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    NS,
    PTR,
    SRV,
    TXT,
    CAA,
    Other(String),
}

impl RecordType {
    /// Returns the canonical upper-case type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::CNAME => "CNAME",
            Self::MX => "MX",
            Self::NS => "NS",
            Self::PTR => "PTR",
            Self::SRV => "SRV",
            Self::TXT => "TXT",
            Self::CAA => "CAA",
            Self::Other(name) => name,
        }
    }

    /// Alias records hold a DNS name rather than a literal value.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::CNAME)
    }

    /// Record types exported to the orchestrator by `records()`.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            Self::A | Self::AAAA | Self::CNAME | Self::MX | Self::NS | Self::PTR | Self::SRV | Self::TXT
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::AAAA,
            "CNAME" => Self::CNAME,
            "MX" => Self::MX,
            "NS" => Self::NS,
            "PTR" => Self::PTR,
            "SRV" => Self::SRV,
            "TXT" => Self::TXT,
            "CAA" => Self::CAA,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// An administrative DNS namespace held by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider identifier
    pub id: String,
    /// Fully-qualified domain suffix, without trailing dot
    pub name: String,
    /// Inactive zones are not reconciled
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Zone {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
        }
    }
}

/// Opaque provider identifier of a record, stable across passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A DNS record as currently stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Identifier of the owning zone
    pub zone_id: String,
    /// Host label relative to the zone; empty or `@` is the apex
    pub host: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
    /// `None` means the provider default applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

/// Record fields queued by the diff engine for creation or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub host: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
    /// `None` defers to the change set's default TTL at apply time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl RecordDraft {
    /// Resolves the TTL against `default_ttl`, producing the payload sent to the provider.
    #[must_use]
    pub fn resolve(&self, default_ttl: u32) -> RecordPayload {
        RecordPayload {
            host: self.host.clone(),
            record_type: self.record_type.clone(),
            value: self.value.clone(),
            ttl: self.ttl.unwrap_or(default_ttl),
        }
    }
}

/// Record fields as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub host: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
}

/// Ordered set of target values, unique by value.
///
/// Duplicates are dropped on construction, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Targets(Vec<String>);

impl Targets {
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.0.iter().any(|t| t == target)
    }

    /// Appends `target` unless it is already present.
    pub fn push(&mut self, target: impl Into<String>) {
        let target = target.into();
        if !self.contains(&target) {
            self.0.push(target);
        }
    }
}

impl From<Vec<String>> for Targets {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<Targets> for Vec<String> {
    fn from(targets: Targets) -> Self {
        targets.0
    }
}

impl<S: Into<String>> FromIterator<S> for Targets {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut targets = Targets::default();
        for target in iter {
            targets.push(target);
        }
        targets
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One desired DNS name, type, target set and TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub dns_name: String,
    pub record_type: RecordType,
    #[serde(default)]
    pub targets: Targets,
    /// 0 means "apply default"
    #[serde(rename = "recordTTL", default)]
    pub ttl: u32,
}

impl Endpoint {
    #[must_use]
    pub fn new<I, S>(dns_name: impl Into<String>, record_type: RecordType, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            record_type,
            targets: targets.into_iter().collect(),
            ttl: 0,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Explicit TTL, or `None` when the default applies.
    #[must_use]
    pub fn configured_ttl(&self) -> Option<u32> {
        (self.ttl != 0).then_some(self.ttl)
    }
}

/// The orchestrator's plan for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Changes {
    #[serde(default)]
    pub create: Vec<Endpoint>,
    #[serde(default)]
    pub update_old: Vec<Endpoint>,
    #[serde(default)]
    pub update_new: Vec<Endpoint>,
    #[serde(default)]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
