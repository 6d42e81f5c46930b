// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end reconciliation passes against the file-backed provider.
//!
//! Run with: cargo test --test reconcile_integration

mod common;

use cloudns_sync::config::Configuration;
use cloudns_sync::errors::{ApplyError, ReconcileError};
use cloudns_sync::snapshot::SnapshotDnsApi;
use cloudns_sync::types::{Changes, Endpoint, RecordType};
use common::harness;
use tokio_util::sync::CancellationToken;

fn values(records: &[cloudns_sync::types::Record], host: &str) -> Vec<String> {
    let mut values: Vec<String> = records
        .iter()
        .filter(|r| r.host == host)
        .map(|r| r.value.clone())
        .collect();
    values.sort();
    values
}

#[tokio::test]
async fn test_records_export() {
    let h = harness(Configuration::default()).await;

    let endpoints = h.provider.records(&CancellationToken::new()).await.unwrap();

    let www = endpoints
        .iter()
        .find(|e| e.dns_name == "www.alpha.com" && e.record_type == RecordType::A)
        .expect("www exported");
    assert_eq!(www.targets.len(), 2);
    assert!(endpoints.iter().any(|e| e.dns_name == "app.sub.alpha.com"));
    let mx = endpoints
        .iter()
        .find(|e| e.record_type == RecordType::MX)
        .expect("mx exported");
    assert_eq!(mx.dns_name, "alpha.com");
    assert_eq!(mx.ttl, 300);
}

#[tokio::test]
async fn test_full_pass_converges_and_is_idempotent() {
    let h = harness(Configuration::default()).await;
    let cancel = CancellationToken::new();
    let changes = Changes {
        create: vec![Endpoint::new("new.sub.alpha.com", RecordType::A, ["9.9.9.9"])],
        update_old: vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1", "2.2.2.2"])],
        update_new: vec![Endpoint::new("www.alpha.com", RecordType::A, ["1.1.1.1", "3.3.3.3"])],
        delete: vec![Endpoint::new("api.alpha.com", RecordType::CNAME, ["www.alpha.com."])],
    };

    let report = h.provider.apply_changes(&changes, &cancel).await.unwrap();
    assert_eq!(report.deleted, 2, "Stale www target and the api alias");
    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);

    let alpha = h.api.stored_records("100").await;
    assert_eq!(values(&alpha, "www"), ["1.1.1.1", "3.3.3.3"]);
    assert!(values(&alpha, "api").is_empty());
    assert_eq!(values(&alpha, "ftp"), ["1.1.1.1"], "Unrelated host untouched");
    let sub = h.api.stored_records("200").await;
    assert_eq!(values(&sub, "new"), ["9.9.9.9"], "Longest zone owns the name");

    let again = Changes {
        update_new: changes.update_new.clone(),
        ..Changes::default()
    };
    let plan = h.provider.plan(&again, &cancel).await.unwrap();
    assert!(plan.is_empty(), "Re-running against converged state is a no-op");
}

#[tokio::test]
async fn test_save_persists_state() {
    let h = harness(Configuration::default()).await;
    let changes = Changes {
        create: vec![Endpoint::new("blog.alpha.com", RecordType::A, ["4.4.4.4"]).with_ttl(900)],
        ..Changes::default()
    };

    h.provider
        .apply_changes(&changes, &CancellationToken::new())
        .await
        .unwrap();
    h.api.save().await.unwrap();

    let reloaded = SnapshotDnsApi::load(h.state.path()).await.unwrap();
    let records = reloaded.stored_records("100").await;
    let blog = records.iter().find(|r| r.host == "blog").expect("blog saved");
    assert_eq!(blog.ttl, Some(900));
    assert_eq!(blog.id.as_str(), "7", "Next id after the highest existing one");
}

#[tokio::test]
async fn test_dry_run_leaves_state_untouched() {
    let config = Configuration {
        dry_run: true,
        ..Configuration::default()
    };
    let h = harness(config).await;
    let changes = Changes {
        delete: vec![Endpoint::new("ftp.alpha.com", RecordType::A, ["1.1.1.1"])],
        ..Changes::default()
    };

    let report = h
        .provider
        .apply_changes(&changes, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(h.api.stored_records("100").await.len(), 5);
}

#[tokio::test]
async fn test_invalid_ttl_stops_pass_after_deletes() {
    let h = harness(Configuration::default()).await;
    let changes = Changes {
        create: vec![Endpoint::new("bad.alpha.com", RecordType::A, ["5.5.5.5"]).with_ttl(123)],
        delete: vec![Endpoint::new("ftp.alpha.com", RecordType::A, ["1.1.1.1"])],
        ..Changes::default()
    };

    let err = h
        .provider
        .apply_changes(&changes, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Apply(ApplyError::InvalidTtl { ttl: 123, .. })
    ));
    let alpha = h.api.stored_records("100").await;
    assert!(values(&alpha, "ftp").is_empty(), "Delete stage ran before the failure");
    assert!(values(&alpha, "bad").is_empty());
}

#[tokio::test]
async fn test_cancelled_pass_fails_fast() {
    let h = harness(Configuration::default()).await;
    let cancel = CancellationToken::new();
    cancel.cancel();
    let changes = Changes {
        create: vec![Endpoint::new("x.alpha.com", RecordType::A, ["5.5.5.5"])],
        ..Changes::default()
    };

    let err = h.provider.apply_changes(&changes, &cancel).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Snapshot(_)));
    let text = h.metrics.gather().unwrap();
    assert!(text.contains("cloudns_sync_failed_api_calls_total{action=\"get_zones\"} 1"));
}
