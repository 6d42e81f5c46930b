// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider API metrics.
//!
//! The reconciler reports through the [`ApiMetrics`] trait, which is passed in
//! explicitly so tests can substitute a recording stub. [`PrometheusMetrics`]
//! is the production implementation with the namespace prefix `cloudns_sync_`.
//!
//! # Metrics
//!
//! - `cloudns_sync_successful_api_calls_total{action}` - provider calls that succeeded
//! - `cloudns_sync_failed_api_calls_total{action}` - provider calls that failed
//! - `cloudns_sync_api_delay_seconds{action}` - provider call latency
//! - `cloudns_sync_filtered_out_zones` - zones rejected by the domain filter
//! - `cloudns_sync_skipped_records{zone}` - records of unsupported types
//!
//! # Example
//!
//! ```rust
//! use cloudns_sync::metrics::{ApiMetrics, PrometheusMetrics};
//! use std::time::Duration;
//!
//! let metrics = PrometheusMetrics::new().unwrap();
//! metrics.inc_successful_api_calls("create_record");
//! metrics.observe_api_delay("create_record", Duration::from_millis(40));
//! assert!(metrics.gather().unwrap().contains("cloudns_sync_successful_api_calls_total"));
//! ```

use crate::constants::{API_DELAY_BUCKETS_SECS, METRICS_NAMESPACE};
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Sink for provider API counters and latency samples.
pub trait ApiMetrics: Send + Sync {
    /// Count a successful call of `action`.
    fn inc_successful_api_calls(&self, action: &str);

    /// Count a failed call of `action`.
    fn inc_failed_api_calls(&self, action: &str);

    /// Record the latency of a successful call of `action`.
    fn observe_api_delay(&self, action: &str, delay: Duration);

    /// Number of zones rejected by the domain filter in the last listing.
    fn set_filtered_out_zones(&self, count: usize);

    /// Number of records of unsupported types in `zone` in the last listing.
    fn set_skipped_records(&self, zone: &str, count: usize);
}

/// Prometheus-backed [`ApiMetrics`] with its own registry.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    successful_api_calls: CounterVec,
    failed_api_calls: CounterVec,
    api_delay: HistogramVec,
    filtered_out_zones: Gauge,
    skipped_records: GaugeVec,
}

impl PrometheusMetrics {
    /// Create and register all metrics in a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric descriptor is invalid or registered twice.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let successful_api_calls = CounterVec::new(
            Opts::new(
                format!("{METRICS_NAMESPACE}_successful_api_calls_total"),
                "Total number of successful provider API calls by action",
            ),
            &["action"],
        )?;
        registry.register(Box::new(successful_api_calls.clone()))?;

        let failed_api_calls = CounterVec::new(
            Opts::new(
                format!("{METRICS_NAMESPACE}_failed_api_calls_total"),
                "Total number of failed provider API calls by action",
            ),
            &["action"],
        )?;
        registry.register(Box::new(failed_api_calls.clone()))?;

        let api_delay = HistogramVec::new(
            HistogramOpts::new(
                format!("{METRICS_NAMESPACE}_api_delay_seconds"),
                "Latency of successful provider API calls in seconds by action",
            )
            .buckets(API_DELAY_BUCKETS_SECS.to_vec()),
            &["action"],
        )?;
        registry.register(Box::new(api_delay.clone()))?;

        let filtered_out_zones = Gauge::with_opts(Opts::new(
            format!("{METRICS_NAMESPACE}_filtered_out_zones"),
            "Number of zones rejected by the domain filter",
        ))?;
        registry.register(Box::new(filtered_out_zones.clone()))?;

        let skipped_records = GaugeVec::new(
            Opts::new(
                format!("{METRICS_NAMESPACE}_skipped_records"),
                "Number of records of unsupported types by zone",
            ),
            &["zone"],
        )?;
        registry.register(Box::new(skipped_records.clone()))?;

        Ok(Self {
            registry,
            successful_api_calls,
            failed_api_calls,
            api_delay,
            filtered_out_zones,
            skipped_records,
        })
    }

    /// Gather and encode all metrics in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
    }
}

impl ApiMetrics for PrometheusMetrics {
    fn inc_successful_api_calls(&self, action: &str) {
        self.successful_api_calls.with_label_values(&[action]).inc();
    }

    fn inc_failed_api_calls(&self, action: &str) {
        self.failed_api_calls.with_label_values(&[action]).inc();
    }

    fn observe_api_delay(&self, action: &str, delay: Duration) {
        self.api_delay
            .with_label_values(&[action])
            .observe(delay.as_secs_f64());
    }

    #[allow(clippy::cast_precision_loss)]
    fn set_filtered_out_zones(&self, count: usize) {
        self.filtered_out_zones.set(count as f64);
    }

    #[allow(clippy::cast_precision_loss)]
    fn set_skipped_records(&self, zone: &str, count: usize) {
        self.skipped_records
            .with_label_values(&[zone])
            .set(count as f64);
    }
}

/// [`ApiMetrics`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl ApiMetrics for NoopMetrics {
    fn inc_successful_api_calls(&self, _action: &str) {}
    fn inc_failed_api_calls(&self, _action: &str) {}
    fn observe_api_delay(&self, _action: &str, _delay: Duration) {}
    fn set_filtered_out_zones(&self, _count: usize) {}
    fn set_skipped_records(&self, _zone: &str, _count: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_api_call_counter() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.inc_successful_api_calls("create_record");
        metrics.inc_successful_api_calls("create_record");

        let counter = metrics
            .successful_api_calls
            .with_label_values(&["create_record"]);
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(counter.get(), 2.0);
        }
    }

    #[test]
    fn test_failed_api_call_counter_is_per_action() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.inc_failed_api_calls("delete_record");

        let deletes = metrics.failed_api_calls.with_label_values(&["delete_record"]);
        let creates = metrics.failed_api_calls.with_label_values(&["create_record"]);
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(deletes.get(), 1.0);
            assert_eq!(creates.get(), 0.0);
        }
    }

    #[test]
    fn test_api_delay_histogram() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.observe_api_delay("update_record", Duration::from_millis(120));

        let histogram = metrics.api_delay.with_label_values(&["update_record"]);
        assert_eq!(histogram.get_sample_count(), 1);
    }

    #[test]
    fn test_registries_are_independent() {
        let first = PrometheusMetrics::new().unwrap();
        let second = PrometheusMetrics::new().unwrap();

        first.inc_successful_api_calls("get_zones");

        let counter = second.successful_api_calls.with_label_values(&["get_zones"]);
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(counter.get(), 0.0, "Each instance owns its own registry");
        }
    }

    #[test]
    fn test_gather_metrics() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.inc_successful_api_calls("get_records");
        metrics.set_filtered_out_zones(3);
        metrics.set_skipped_records("example.com", 2);

        let text = metrics.gather().unwrap();
        assert!(
            text.contains("cloudns_sync_successful_api_calls_total"),
            "Metrics should contain the success counter"
        );
        assert!(text.contains("cloudns_sync_filtered_out_zones 3"));
        assert!(text.contains("zone=\"example.com\""));
    }
}
