//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): request latency
//! - `gateway_source_fetches_total` (counter): fetches by source, status
//! - `gateway_source_fetch_duration_seconds` (histogram): fetch latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "Failed to install metrics exporter"),
    }
}

/// Record a completed gateway request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("gateway_requests_total", &labels).increment(1);
    metrics::histogram!("gateway_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record one completed source fetch.
pub fn record_source_fetch(source: &str, status: u16, start_time: Instant) {
    let labels = [
        ("source", source.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("gateway_source_fetches_total", &labels).increment(1);
    metrics::histogram!("gateway_source_fetch_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}
