// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Delete pass: endpoints that must disappear entirely.

use super::matching::{matching_domain_records, target_matches, targets_match};
use crate::changes::ChangeSet;
use crate::types::{Endpoint, Record, Zone};
use tracing::{info, warn};

/// Queue a delete for every matching record holding one of the endpoint's targets.
pub fn process_delete_actions_by_endpoint(
    zone: &Zone,
    matching: &[&Record],
    endpoint: &Endpoint,
    changes: &mut ChangeSet,
) {
    for record in matching {
        if targets_match(record, &zone.name, endpoint) {
            changes.add_delete(&zone.id, (*record).clone());
        }
    }

    for target in &endpoint.targets {
        if !matching
            .iter()
            .any(|r| target_matches(r, &zone.name, endpoint, target))
        {
            info!(
                zone = %zone.name,
                dns_name = %endpoint.dns_name,
                record_type = %endpoint.record_type,
                target = %target,
                "Record not found, nothing to delete"
            );
        }
    }
}

/// Run the delete pass for every endpoint of `zone`.
pub fn process_delete_actions_by_zone(
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
                "Records to delete not found"
            );
        }
        process_delete_actions_by_endpoint(zone, &matching, endpoint, changes);
    }
}

#[cfg(test)]
#[path = "delete_tests.rs"]
mod delete_tests;
