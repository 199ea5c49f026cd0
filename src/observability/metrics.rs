//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define aggregator metrics (requests, latency, upstream outcomes, degradations)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `aggregator_requests_total` (counter): requests by status
//! - `aggregator_request_duration_seconds` (histogram): end-to-end latency
//! - `aggregator_upstream_calls_total` (counter): calls by upstream and outcome
//! - `aggregator_degraded_total` (counter): responses sent without context, by reason
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op (tests, metrics disabled)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished HTTP request.
pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("aggregator_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("aggregator_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one upstream call.
pub fn record_upstream_call(upstream: &'static str, outcome: &'static str) {
    metrics::counter!(
        "aggregator_upstream_calls_total",
        "upstream" => upstream,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a response sent without its optional context.
pub fn record_degraded(reason: &'static str) {
    metrics::counter!("aggregator_degraded_total", "reason" => reason).increment(1);
}
