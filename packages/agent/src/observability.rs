// packages/agent/src/observability.rs
//! Logging and metrics for host processes
//!
//! The agent itself only emits `tracing` events and `metrics` counters.
//! These helpers install a JSON log subscriber and an in-process Prometheus
//! recorder for hosts (test drivers, native shells) that want to see them.
//!
//! Counters:
//! - `rum_agent_events_sent_total{kind}`
//! - `rum_agent_events_dropped_total{kind}`
//! - `rum_agent_transport_failures_total{kind}`
//! - `rum_agent_capture_faults_total{strategy}`

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "rum_agent=info";

/// Install a global JSON `tracing` subscriber filtered by `RUST_LOG`
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_target(true))
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Install the global Prometheus recorder and return its render handle
pub fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")
}
