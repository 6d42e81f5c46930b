// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Update pass: target-level reconciliation of endpoints that already exist.
//!
//! For each desired target the matching record is consumed from a
//! [`TargetIndex`]. Consumed records are rewritten only if a field changed,
//! missing targets are created, and whatever stays unconsumed is deleted.
//! Only the targets that actually changed produce an operation.

use super::matching::{desired_draft, matching_domain_records, needs_update, normalized_targets};
use crate::changes::ChangeSet;
use crate::index::TargetIndex;
use crate::types::{Endpoint, Record, Zone};
use tracing::{debug, warn};

/// Queue updates and creates for the desired targets of `endpoint`.
pub fn process_update_endpoint(
    zone: &Zone,
    index: &mut TargetIndex,
    endpoint: &Endpoint,
    changes: &mut ChangeSet,
) {
    let default_ttl = changes.default_ttl();

    for target in &normalized_targets(&zone.name, endpoint) {
        let draft = desired_draft(zone, endpoint, target);
        match index.consume(target) {
            Some(existing) if needs_update(existing, &draft, default_ttl) => {
                changes.add_update(&zone.id, existing.clone(), draft);
            }
            Some(existing) => {
                debug!(
                    zone = %zone.name,
                    record_id = %existing.id,
                    value = %existing.value,
                    "Record already up to date"
                );
            }
            None => changes.add_create(&zone.id, draft),
        }
    }
}

/// Queue deletes for every record left unconsumed in `index`.
///
/// Records displaced by a duplicate target are deleted as well, leaving one
/// record per target.
pub fn cleanup_remaining_targets(zone: &Zone, index: &TargetIndex, changes: &mut ChangeSet) {
    for record in index.remaining() {
        changes.add_delete(&zone.id, record.clone());
    }

    for duplicate in index.duplicates() {
        warn!(
            zone = %zone.name,
            record_id = %duplicate.id,
            host = %duplicate.host,
            record_type = %duplicate.record_type,
            value = %duplicate.value,
            "Duplicate record for the same target, deleting"
        );
        changes.add_delete(&zone.id, duplicate.clone());
    }
}

/// Run the update pass for every endpoint of `zone`.
pub fn process_update_actions_by_zone(
    zone: &Zone,
    records: &[Record],
    endpoints: &[Endpoint],
    changes: &mut ChangeSet,
) {
    for endpoint in endpoints {
        let matching = matching_domain_records(records, &zone.name, endpoint);
        if matching.is_empty() {
            warn!(
                zone = %zone.name,
                dns_name = %endpoint.dns_name,
                record_type = %endpoint.record_type,
                "Planning an update but no existing records found"
            );
        }

        let mut index = TargetIndex::from_records(matching);
        process_update_endpoint(zone, &mut index, endpoint, changes);

        // Anything left was removed from the endpoint.
        cleanup_remaining_targets(zone, &index, changes);
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod update_tests;
