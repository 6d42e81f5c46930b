// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `zones` module

#[cfg(test)]
mod tests {
    use crate::types::{Endpoint, RecordType, Zone};
    use crate::zones::{find_zone, partition_by_zone};

    fn zones() -> Vec<Zone> {
        vec![
            Zone::new("1", "example.com"),
            Zone::new("2", "sub.example.com"),
            Zone::new("3", "other.org"),
        ]
    }

    #[test]
    fn test_longest_zone_wins() {
        let zones = zones();
        assert_eq!(find_zone("www.sub.example.com", &zones).unwrap().id, "2");
        assert_eq!(find_zone("www.example.com", &zones).unwrap().id, "1");
    }

    #[test]
    fn test_apex_and_trailing_dot() {
        let zones = zones();
        assert_eq!(find_zone("example.com.", &zones).unwrap().id, "1");
        assert_eq!(find_zone("sub.example.com", &zones).unwrap().id, "2");
    }

    #[test]
    fn test_dash_prefixed_name_matches() {
        let zones = zones();
        assert_eq!(
            find_zone("a-example.com", &zones).unwrap().id,
            "1",
            "Registry names of the form <prefix>-zone belong to the zone"
        );
    }

    #[test]
    fn test_no_match() {
        let zones = zones();
        assert!(find_zone("example.net", &zones).is_none());
        assert!(find_zone("notexample.com", &zones).is_none(), "Suffix must sit on a boundary");
        assert!(find_zone("www.example.com", &[]).is_none());
    }

    #[test]
    fn test_partition_groups_by_zone_and_skips_unknown() {
        let endpoints = vec![
            Endpoint::new("www.example.com", RecordType::A, ["1.1.1.1"]),
            Endpoint::new("api.sub.example.com", RecordType::A, ["2.2.2.2"]),
            Endpoint::new("mail.example.com", RecordType::A, ["3.3.3.3"]),
            Endpoint::new("www.unknown.net", RecordType::A, ["4.4.4.4"]),
        ];

        let by_zone = partition_by_zone(&endpoints, &zones());

        assert_eq!(by_zone.len(), 2);
        let names: Vec<&str> = by_zone["1"].iter().map(|e| e.dns_name.as_str()).collect();
        assert_eq!(names, ["www.example.com", "mail.example.com"], "Input order kept");
        assert_eq!(by_zone["2"].len(), 1);
        assert!(!by_zone.values().flatten().any(|e| e.dns_name == "www.unknown.net"));
    }
}
