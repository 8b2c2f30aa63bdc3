// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the BlueCat solver.
//!
//! All metrics carry the namespace prefix `bluecat_webhook_`.
//!
//! # Metrics Categories
//!
//! - **API Metrics** - BlueCat REST calls by operation and outcome
//! - **Challenge Metrics** - Present/CleanUp outcomes
//!
//! # Example
//!
//! ```rust,no_run
//! use bluecat_webhook::metrics::record_challenge;
//!
//! record_challenge("present", "success", std::time::Duration::from_secs(1));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

/// Namespace prefix for all solver metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "bluecat_webhook";

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// API Metrics
// ============================================================================

/// Total number of BlueCat API requests
///
/// Labels:
/// - `operation`: Client operation (e.g., `resolve_zone`, `quick_deploy`)
/// - `outcome`: `success` or an error reason code (e.g., `TransientError`)
pub static API_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_api_requests_total"),
        "Total number of BlueCat API requests by operation and outcome",
    );
    let counter = CounterVec::new(opts, &["operation", "outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of BlueCat API requests in seconds
///
/// Labels:
/// - `operation`: Client operation
pub static API_REQUEST_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_api_request_duration_seconds"),
        "Duration of BlueCat API requests in seconds by operation",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Challenge Metrics
// ============================================================================

/// Total number of challenge operations
///
/// Labels:
/// - `action`: `present` or `cleanup`
/// - `outcome`: `success` or an error reason code
pub static CHALLENGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_challenges_total"),
        "Total number of DNS-01 challenge operations by action and outcome",
    );
    let counter = CounterVec::new(opts, &["action", "outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of challenge operations in seconds
///
/// Labels:
/// - `action`: `present` or `cleanup`
pub static CHALLENGE_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_challenge_duration_seconds"),
        "Duration of DNS-01 challenge operations in seconds by action",
    )
    .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]);
    let histogram = HistogramVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a completed BlueCat API request
///
/// # Arguments
/// * `operation` - Client operation name
/// * `outcome` - `success` or an error reason code
/// * `duration` - Time spent on the request
pub fn record_api_request(operation: &str, outcome: &str, duration: Duration) {
    API_REQUESTS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    API_REQUEST_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration.as_secs_f64());
}

/// Record a completed challenge operation
///
/// # Arguments
/// * `action` - `present` or `cleanup`
/// * `outcome` - `success` or an error reason code
/// * `duration` - Time spent on the whole operation
pub fn record_challenge(action: &str, outcome: &str, duration: Duration) {
    CHALLENGES_TOTAL.with_label_values(&[action, outcome]).inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
