//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_weather_requests_total` (counter): requests by route, status
//! - `cep_weather_request_duration_seconds` (histogram): latency by route
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter only runs when an address is configured

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(
        "cep_weather_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("cep_weather_request_duration_seconds", "route" => route).record(elapsed);
}
