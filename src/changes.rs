// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pending record operations for one reconciliation pass.
//!
//! A [`ChangeSet`] is created empty at the start of a pass, populated only by
//! the diff engine, and consumed once by [`crate::apply::ApplyPipeline`].
//! TTL defaulting happens at apply time: drafts keep `ttl: None` so the stored
//! intent stays distinct from the value sent to the provider.

use crate::types::{Record, RecordDraft};
use serde::Serialize;
use std::fmt;

/// A record to create in a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeCreate {
    pub zone_id: String,
    pub record: RecordDraft,
}

/// An existing record to rewrite with new field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeUpdate {
    pub zone_id: String,
    /// The matched record from this pass's snapshot; carries the identifier
    pub existing: Record,
    pub desired: RecordDraft,
}

/// An existing record to remove from a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeDelete {
    pub zone_id: String,
    pub record: Record,
}

/// One `key=value` pair of a change's log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogField {
    pub key: &'static str,
    pub value: String,
    /// Marks the new value of an updated field
    pub is_new: bool,
}

/// Structured fields describing a change, rendered as `key=value` pairs.
///
/// New values of an update are prefixed with `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFields(Vec<LogField>);

impl ChangeFields {
    fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.0.push(LogField {
            key,
            value: value.to_string(),
            is_new: false,
        });
        self
    }

    fn push_new(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.0.push(LogField {
            key,
            value: value.to_string(),
            is_new: true,
        });
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[LogField] {
        &self.0
    }

    /// Value of the first field named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LogField> {
        self.0.iter().find(|f| f.key == key)
    }
}

impl fmt::Display for ChangeFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if field.is_new {
                f.write_str("*")?;
            }
            write!(f, "{}={}", field.key, field.value)?;
        }
        Ok(())
    }
}

fn ttl_field(ttl: Option<u32>) -> String {
    ttl.map_or_else(|| "default".to_string(), |t| t.to_string())
}

impl ChangeCreate {
    #[must_use]
    pub fn log_fields(&self) -> ChangeFields {
        let mut fields = ChangeFields::default();
        fields
            .push("zone", &self.zone_id)
            .push("host", &self.record.host)
            .push("type", &self.record.record_type)
            .push("value", &self.record.value)
            .push("ttl", ttl_field(self.record.ttl));
        fields
    }
}

impl ChangeUpdate {
    #[must_use]
    pub fn log_fields(&self) -> ChangeFields {
        let mut fields = ChangeFields::default();
        fields
            .push("zone", &self.zone_id)
            .push("record_id", &self.existing.id)
            .push("host", &self.existing.host)
            .push("type", &self.existing.record_type)
            .push("value", &self.existing.value)
            .push("ttl", ttl_field(self.existing.ttl))
            .push_new("host", &self.desired.host)
            .push_new("type", &self.desired.record_type)
            .push_new("value", &self.desired.value)
            .push_new("ttl", ttl_field(self.desired.ttl));
        fields
    }
}

impl ChangeDelete {
    #[must_use]
    pub fn log_fields(&self) -> ChangeFields {
        let mut fields = ChangeFields::default();
        fields
            .push("zone", &self.zone_id)
            .push("record_id", &self.record.id)
            .push("host", &self.record.host)
            .push("type", &self.record.record_type)
            .push("value", &self.record.value)
            .push("ttl", ttl_field(self.record.ttl));
        fields
    }
}

/// Create, update and delete operations accumulated for one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    dry_run: bool,
    default_ttl: u32,
    creates: Vec<ChangeCreate>,
    updates: Vec<ChangeUpdate>,
    deletes: Vec<ChangeDelete>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new(dry_run: bool, default_ttl: u32) -> Self {
        Self {
            dry_run,
            default_ttl,
            creates: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
        }
    }

    /// Returns true if there are no changes queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Queues a record creation.
    pub fn add_create(&mut self, zone_id: impl Into<String>, record: RecordDraft) {
        self.creates.push(ChangeCreate {
            zone_id: zone_id.into(),
            record,
        });
    }

    /// Queues an update of `existing` to the `desired` field values.
    pub fn add_update(&mut self, zone_id: impl Into<String>, existing: Record, desired: RecordDraft) {
        self.updates.push(ChangeUpdate {
            zone_id: zone_id.into(),
            existing,
            desired,
        });
    }

    /// Queues the deletion of `record`.
    pub fn add_delete(&mut self, zone_id: impl Into<String>, record: Record) {
        self.deletes.push(ChangeDelete {
            zone_id: zone_id.into(),
            record,
        });
    }

    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub fn default_ttl(&self) -> u32 {
        self.default_ttl
    }

    #[must_use]
    pub fn creates(&self) -> &[ChangeCreate] {
        &self.creates
    }

    #[must_use]
    pub fn updates(&self) -> &[ChangeUpdate] {
        &self.updates
    }

    #[must_use]
    pub fn deletes(&self) -> &[ChangeDelete] {
        &self.deletes
    }

    /// Total number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.creates.len() + self.updates.len() + self.deletes.len()
    }
}

#[cfg(test)]
#[path = "changes_tests.rs"]
mod changes_tests;
