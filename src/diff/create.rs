// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Create pass: endpoints expected to have no prior records.

use super::matching::{desired_draft, matching_domain_records, normalized_targets};
use crate::changes::ChangeSet;
use crate::types::{Endpoint, Record, Zone};
use tracing::warn;

/// Queue one create per target of every endpoint in `zone`.
///
/// Pre-existing matching records only raise a warning: this pass never
/// turns a create into an update.
pub fn process_create_actions_by_zone(
    zone: &Zone,
    records: &[Record],
    endpoints: &[Endpoint],
    changes: &mut ChangeSet,
) {
    for endpoint in endpoints {
        let matching = matching_domain_records(records, &zone.name, endpoint);
        if !matching.is_empty() {
            warn!(
                zone = %zone.name,
                dns_name = %endpoint.dns_name,
                record_type = %endpoint.record_type,
                existing = matching.len(),
                "Preexisting records exist which should not exist for creation actions"
            );
        }

        for target in &normalized_targets(&zone.name, endpoint) {
            changes.add_create(&zone.id, desired_draft(zone, endpoint, target));
        }
    }
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod create_tests;
