// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Lookup structures built from the provider snapshot of one pass.
//!
//! - [`RecordSnapshot`] maps zone identifiers to their zone and existing records.
//! - [`TargetIndex`] maps target values to records within one name/type pair and
//!   tracks which entries have been consumed by the update pass.
//!
//! Both are rebuilt from fresh provider state every pass, so record identifiers
//! in a change set always come from the current snapshot.

use crate::types::{Record, Zone};
use std::collections::{BTreeSet, HashMap};

/// Zones and their records as fetched at the start of one pass.
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    zones: HashMap<String, Zone>,
    records: HashMap<String, Vec<Record>>,
}

impl RecordSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `zone` with its `records`, replacing any previous entry for the same id.
    pub fn insert_zone(&mut self, zone: Zone, records: Vec<Record>) {
        self.records.insert(zone.id.clone(), records);
        self.zones.insert(zone.id.clone(), zone);
    }

    #[must_use]
    pub fn zone(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.get(zone_id)
    }

    /// Records of the zone, empty when the zone is unknown.
    #[must_use]
    pub fn records(&self, zone_id: &str) -> &[Record] {
        self.records.get(zone_id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

/// Target value to record index for the records of one name/type pair.
///
/// Insertion order is kept separately from consumption: [`TargetIndex::consume`]
/// marks an entry as matched by a desired target, and [`TargetIndex::remaining`]
/// yields the unconsumed records in their original order.
///
/// When two records share a target the later one is used for matching and the
/// earlier one is kept in [`TargetIndex::duplicates`].
#[derive(Debug, Clone, Default)]
pub struct TargetIndex {
    records: Vec<Record>,
    by_target: HashMap<String, usize>,
    unconsumed: BTreeSet<usize>,
    duplicates: Vec<Record>,
}

impl TargetIndex {
    /// Build the index from existing records, keyed by their stored value.
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut index = Self::default();
        for record in records {
            index.insert(record.clone());
        }
        index
    }

    fn insert(&mut self, record: Record) {
        let position = self.records.len();
        if let Some(previous) = self.by_target.insert(record.value.clone(), position) {
            self.unconsumed.remove(&previous);
            self.duplicates.push(self.records[previous].clone());
        }
        self.unconsumed.insert(position);
        self.records.push(record);
    }

    /// Mark the record for `target` as matched and return it.
    ///
    /// Returns `None` when no record holds `target` or it was already consumed.
    pub fn consume(&mut self, target: &str) -> Option<&Record> {
        let position = *self.by_target.get(target)?;
        if self.unconsumed.remove(&position) {
            Some(&self.records[position])
        } else {
            None
        }
    }

    /// Records not consumed so far, in insertion order.
    pub fn remaining(&self) -> impl Iterator<Item = &Record> {
        self.unconsumed.iter().map(|&i| &self.records[i])
    }

    /// Records displaced by a later record with the same target.
    #[must_use]
    pub fn duplicates(&self) -> &[Record] {
        &self.duplicates
    }

    /// Number of distinct targets indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

/// Index `records` by target value.
#[must_use]
pub fn index_by_target(records: &[Record]) -> TargetIndex {
    TargetIndex::from_records(records)
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod index_tests;
