// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Diff engine: computes the record operations that converge provider state.
//!
//! The desired batch arrives pre-partitioned into endpoints to create, update
//! and delete, each keyed by zone identifier. Every group has its own pass:
//!
//! - [`create`] - net-new endpoints, one create per target
//! - [`update`] - existing endpoints, reconciled target by target
//! - [`delete`] - endpoints to remove, deleting every matching record
//!
//! The per-zone drivers below skip empty batches and unknown zones, and never
//! touch zones absent from the batch. Mismatches between the plan and the
//! snapshot are logged and the diff continues with whatever is derivable.
//!
//! # Example
//!
//! ```rust
//! use cloudns_sync::changes::ChangeSet;
//! use cloudns_sync::diff::{diff, DesiredBatches};
//! use cloudns_sync::index::RecordSnapshot;
//! use cloudns_sync::types::{Endpoint, RecordType, Zone};
//!
//! let mut snapshot = RecordSnapshot::new();
//! snapshot.insert_zone(Zone::new("alpha.com", "alpha.com"), vec![]);
//!
//! let mut batches = DesiredBatches::default();
//! batches.creates.insert(
//!     "alpha.com".to_string(),
//!     vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1"])],
//! );
//!
//! let mut changes = ChangeSet::new(false, 3600);
//! diff(&snapshot, &batches, &mut changes);
//! assert_eq!(changes.creates().len(), 1);
//! ```

pub mod create;
pub mod delete;
pub mod matching;
pub mod update;

use crate::changes::ChangeSet;
use crate::index::RecordSnapshot;
use crate::types::{Endpoint, Record, Zone};
use crate::zones::EndpointsByZone;
use tracing::{debug, warn};

pub use create::process_create_actions_by_zone;
pub use delete::process_delete_actions_by_zone;
pub use update::process_update_actions_by_zone;

/// Desired endpoints of one pass, grouped by intent and zone identifier.
#[derive(Debug, Clone, Default)]
pub struct DesiredBatches {
    pub creates: EndpointsByZone,
    pub updates: EndpointsByZone,
    pub deletes: EndpointsByZone,
}

impl DesiredBatches {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.values().all(Vec::is_empty)
            && self.updates.values().all(Vec::is_empty)
            && self.deletes.values().all(Vec::is_empty)
    }
}

fn process_by_zone<F>(
    action: &str,
    snapshot: &RecordSnapshot,
    batches: &EndpointsByZone,
    changes: &mut ChangeSet,
    mut per_zone: F,
) where
    F: FnMut(&Zone, &[Record], &[Endpoint], &mut ChangeSet),
{
    for (zone_id, endpoints) in batches {
        if endpoints.is_empty() {
            debug!(zone_id = %zone_id, action, "Skipping zone, no endpoints found");
            continue;
        }
        let Some(zone) = snapshot.zone(zone_id) else {
            warn!(
                zone_id = %zone_id,
                action,
                endpoints = endpoints.len(),
                "Skipping zone, not present in provider snapshot"
            );
            continue;
        };
        per_zone(zone, snapshot.records(zone_id), endpoints, changes);
    }
}

/// Run the create pass for every zone in `creates`.
pub fn process_create_actions(
    snapshot: &RecordSnapshot,
    creates: &EndpointsByZone,
    changes: &mut ChangeSet,
) {
    process_by_zone("create", snapshot, creates, changes, process_create_actions_by_zone);
}

/// Run the update pass for every zone in `updates`.
pub fn process_update_actions(
    snapshot: &RecordSnapshot,
    updates: &EndpointsByZone,
    changes: &mut ChangeSet,
) {
    process_by_zone("update", snapshot, updates, changes, process_update_actions_by_zone);
}

/// Run the delete pass for every zone in `deletes`.
pub fn process_delete_actions(
    snapshot: &RecordSnapshot,
    deletes: &EndpointsByZone,
    changes: &mut ChangeSet,
) {
    process_by_zone("delete", snapshot, deletes, changes, process_delete_actions_by_zone);
}

/// Run all three passes of `batches` against `snapshot`, populating `changes`.
pub fn diff(snapshot: &RecordSnapshot, batches: &DesiredBatches, changes: &mut ChangeSet) {
    process_delete_actions(snapshot, &batches.deletes, changes);
    process_create_actions(snapshot, &batches.creates, changes);
    process_update_actions(snapshot, &batches.updates, changes);

    debug!(
        creates = changes.creates().len(),
        updates = changes.updates().len(),
        deletes = changes.deletes().len(),
        "Diff complete"
    );
}
