// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `diff::update` module

#[cfg(test)]
mod tests {
    use crate::changes::ChangeSet;
    use crate::diff::update::process_update_actions_by_zone;
    use crate::test_support::record;
    use crate::types::{Endpoint, Record, RecordType, Zone};

    fn zone() -> Zone {
        Zone::new("z1", "alpha.com")
    }

    fn www(id: &str, value: &str) -> Record {
        record(id, "z1", "www", RecordType::A, value)
    }

    #[test]
    fn test_only_changed_target_produces_operations() {
        let records = vec![www("1", "1.1.1.1"), www("2", "2.2.2.2")];
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1", "3.3.3.3"])];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &records, &endpoints, &mut changes);

        assert!(changes.updates().is_empty(), "Unchanged target is not rewritten");
        assert_eq!(changes.creates().len(), 1);
        assert_eq!(changes.creates()[0].record.value, "3.3.3.3");
        assert_eq!(changes.deletes().len(), 1);
        assert_eq!(changes.deletes()[0].record.id.as_str(), "2");
    }

    #[test]
    fn test_ttl_change_updates_existing_record() {
        let records = vec![www("1", "1.1.1.1")];
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1"]).with_ttl(300)];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &records, &endpoints, &mut changes);

        assert_eq!(changes.len(), 1);
        let update = &changes.updates()[0];
        assert_eq!(update.existing.id.as_str(), "1", "Update carries the existing identifier");
        assert_eq!(update.desired.ttl, Some(300));
    }

    #[test]
    fn test_converged_endpoint_yields_nothing() {
        let mut existing = www("1", "1.1.1.1");
        existing.ttl = Some(300);
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1"]).with_ttl(300)];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &[existing], &endpoints, &mut changes);

        assert!(changes.is_empty());
    }

    #[test]
    fn test_update_without_existing_records_creates() {
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1"])];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &[], &endpoints, &mut changes);

        assert_eq!(changes.creates().len(), 1);
        assert!(changes.deletes().is_empty());
    }

    #[test]
    fn test_removed_targets_are_deleted() {
        let records = vec![www("1", "1.1.1.1"), www("2", "2.2.2.2"), www("3", "3.3.3.3")];
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::A, ["2.2.2.2"])];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &records, &endpoints, &mut changes);

        let deleted: Vec<&str> = changes.deletes().iter().map(|d| d.record.id.as_str()).collect();
        assert_eq!(deleted, ["1", "3"]);
        assert!(changes.creates().is_empty());
    }

    #[test]
    fn test_duplicate_records_are_deleted() {
        let records = vec![www("1", "1.1.1.1"), www("2", "1.1.1.1")];
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1"])];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &records, &endpoints, &mut changes);

        assert!(changes.updates().is_empty(), "The kept duplicate is already converged");
        assert_eq!(changes.deletes().len(), 1);
        assert_eq!(changes.deletes()[0].record.id.as_str(), "1");
    }

    #[test]
    fn test_alias_update_matches_normalized_target() {
        let records = vec![record("1", "z1", "api", RecordType::CNAME, "www")];
        let endpoints = vec![Endpoint::new("api.alpha.com", RecordType::CNAME, ["www.alpha.com."])];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &records, &endpoints, &mut changes);

        assert!(changes.is_empty(), "www.alpha.com. is stored as www");
    }

    #[test]
    fn test_quoted_txt_target_is_converged() {
        let mut existing = record(
            "1",
            "z1",
            "www",
            RecordType::TXT,
            "heritage=external-dns,external-dns/owner=default",
        );
        existing.ttl = Some(300);
        let endpoints = vec![Endpoint::new(
            "www.alpha.com",
            RecordType::TXT,
            ["\"heritage=external-dns,external-dns/owner=default\""],
        )
        .with_ttl(300)];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &[existing], &endpoints, &mut changes);

        assert!(changes.is_empty(), "Quoted TXT target is not recreated");
    }

    #[test]
    fn test_quoted_txt_target_is_created_bare() {
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::TXT, ["\"owner=default\""])];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &[], &endpoints, &mut changes);

        assert_eq!(changes.creates().len(), 1);
        assert_eq!(changes.creates()[0].record.value, "owner=default");
    }

    #[test]
    fn test_other_record_types_untouched() {
        let records = vec![www("1", "1.1.1.1"), record("2", "z1", "www", RecordType::AAAA, "::1")];
        let endpoints = vec![Endpoint::new("www.alpha.com", RecordType::A, ["4.4.4.4"])];
        let mut changes = ChangeSet::new(false, 3600);

        process_update_actions_by_zone(&zone(), &records, &endpoints, &mut changes);

        assert_eq!(changes.deletes().len(), 1);
        assert_eq!(changes.deletes()[0].record.id.as_str(), "1");
    }
}
