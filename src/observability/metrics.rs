//! # Metrics
//!
//! Prometheus metrics for monitoring the adapter.
//!
//! ## Metrics Exposed
//!
//! - `broker_proxy_broker_operations_total` - Broker/secret operations by operation name
//! - `broker_proxy_broker_operation_errors_total` - Failed operations by operation name
//! - `broker_proxy_broker_operation_duration_seconds` - Duration of cluster API operations
//! - `broker_proxy_catalog_relists_total` - Relist requests actually sent to the cluster
//! - `broker_proxy_catalog_relists_coalesced_total` - Catalog fetches skipped because one was in flight
//! - `broker_proxy_syncs_in_progress` - Catalog fetches currently in flight
//!
//! Counters are always updated. [`register_metrics`] only decides whether they
//! show up in [`gather_metrics`].

use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static BROKER_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "broker_proxy_broker_operations_total",
            "Total number of broker and credential secret operations",
        ),
        &["operation"],
    )
    .expect("Failed to create BROKER_OPERATIONS_TOTAL metric - this should never happen")
});

static BROKER_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "broker_proxy_broker_operation_errors_total",
            "Total number of failed broker and credential secret operations",
        ),
        &["operation"],
    )
    .expect("Failed to create BROKER_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static BROKER_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "broker_proxy_broker_operation_duration_seconds",
            "Duration of cluster API operations in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 30.0]),
        &["operation"],
    )
    .expect("Failed to create BROKER_OPERATION_DURATION metric - this should never happen")
});

static CATALOG_RELISTS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "broker_proxy_catalog_relists_total",
        "Total number of relist requests sent to the cluster",
    )
    .expect("Failed to create CATALOG_RELISTS_TOTAL metric - this should never happen")
});

static CATALOG_RELISTS_COALESCED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "broker_proxy_catalog_relists_coalesced_total",
        "Total number of catalog fetches answered without a relist because one was already in flight",
    )
    .expect("Failed to create CATALOG_RELISTS_COALESCED_TOTAL metric - this should never happen")
});

static SYNCS_IN_PROGRESS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "broker_proxy_syncs_in_progress",
        "Current number of catalog fetches in flight",
    )
    .expect("Failed to create SYNCS_IN_PROGRESS metric - this should never happen")
});

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(BROKER_OPERATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(BROKER_OPERATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(BROKER_OPERATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(CATALOG_RELISTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CATALOG_RELISTS_COALESCED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SYNCS_IN_PROGRESS.clone()))?;

    Ok(())
}

/// Render the registry in the prometheus text exposition format
pub fn gather_metrics() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record the outcome of one cluster API operation
pub fn record_broker_operation(operation: &str, succeeded: bool, duration: f64) {
    BROKER_OPERATIONS_TOTAL
        .with_label_values(&[operation])
        .inc();
    BROKER_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration);
    if !succeeded {
        BROKER_OPERATION_ERRORS_TOTAL
            .with_label_values(&[operation])
            .inc();
    }
}

pub fn increment_catalog_relists() {
    CATALOG_RELISTS_TOTAL.inc();
}

pub fn increment_catalog_relists_coalesced() {
    CATALOG_RELISTS_COALESCED_TOTAL.inc();
}

pub fn increment_syncs_in_progress() {
    SYNCS_IN_PROGRESS.inc();
}

pub fn decrement_syncs_in_progress() {
    SYNCS_IN_PROGRESS.dec();
}
