//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Active peer connection gauge
//! - Commands received by kind and outcome
//! - Snapshots sent to remotes
//! - Clock ticks applied

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "stage_timer";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Remotes currently attached to the host
pub static PEER_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("peer_connections_active", "Number of attached remote connections")
            .namespace(NAMESPACE),
    )
    .expect("Failed to create PEER_CONNECTIONS_ACTIVE metric")
});

/// Commands received, by kind and outcome
pub static PEER_COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("peer_commands_total", "Total number of commands received").namespace(NAMESPACE),
        &["kind", "outcome"],
    )
    .expect("Failed to create PEER_COMMANDS_TOTAL metric")
});

/// Snapshots delivered to open connections
pub static SNAPSHOTS_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("snapshots_sent_total", "Total number of snapshots sent to remotes")
            .namespace(NAMESPACE),
    )
    .expect("Failed to create SNAPSHOTS_SENT_TOTAL metric")
});

/// Clock ticks applied to a running session
pub static CLOCK_TICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("clock_ticks_total", "Total number of countdown ticks").namespace(NAMESPACE),
    )
    .expect("Failed to create CLOCK_TICKS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(PEER_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register PEER_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(PEER_COMMANDS_TOTAL.clone()))
        .expect("Failed to register PEER_COMMANDS_TOTAL");
    registry
        .register(Box::new(SNAPSHOTS_SENT_TOTAL.clone()))
        .expect("Failed to register SNAPSHOTS_SENT_TOTAL");
    registry
        .register(Box::new(CLOCK_TICKS_TOTAL.clone()))
        .expect("Failed to register CLOCK_TICKS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record a received command
pub fn record_command(kind: &str, outcome: &str) {
    PEER_COMMANDS_TOTAL.with_label_values(&[kind, outcome]).inc();
}

/// Helper to record snapshots delivered by one broadcast
pub fn record_snapshots_sent(count: usize) {
    SNAPSHOTS_SENT_TOTAL.inc_by(count as u64);
}

/// Helper to record a clock tick
pub fn record_tick() {
    CLOCK_TICKS_TOTAL.inc();
}

/// Helper to update the attached connection count
pub fn set_peer_connections(count: usize) {
    PEER_CONNECTIONS_ACTIVE.set(count as i64);
}
