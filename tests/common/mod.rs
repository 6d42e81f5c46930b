// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use cloudns_sync::config::Configuration;
use cloudns_sync::metrics::PrometheusMetrics;
use cloudns_sync::provider::CloudnsProvider;
use cloudns_sync::snapshot::SnapshotDnsApi;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Provider state with two zones used across the integration tests
pub const STATE_YAML: &str = r#"
zones:
  - id: "100"
    name: alpha.com
    records:
      - { id: "1", host: www, type: A, value: 1.1.1.1 }
      - { id: "2", host: www, type: A, value: 2.2.2.2 }
      - { id: "3", host: ftp, type: A, value: 1.1.1.1 }
      - { id: "4", host: api, type: CNAME, value: www }
      - { id: "5", host: "@", type: MX, value: 10 mail.alpha.com, ttl: 300 }
  - id: "200"
    name: sub.alpha.com
    records:
      - { id: "6", host: app, type: A, value: 6.6.6.6 }
"#;

/// Write `contents` to a temporary file with the given extension
pub fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

/// Everything needed to run a pass against a state file
pub struct Harness {
    pub state: NamedTempFile,
    pub api: Arc<SnapshotDnsApi>,
    pub metrics: Arc<PrometheusMetrics>,
    pub provider: CloudnsProvider,
}

pub async fn harness(config: Configuration) -> Harness {
    let state = temp_file(".yaml", STATE_YAML);
    let api = Arc::new(SnapshotDnsApi::load(state.path()).await.expect("load state"));
    let metrics = Arc::new(PrometheusMetrics::new().expect("metrics"));
    let provider = CloudnsProvider::new(api.clone(), metrics.clone(), config);
    Harness {
        state,
        api,
        metrics,
        provider,
    }
}
