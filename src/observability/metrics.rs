//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_checks_total` (counter): completed checks by address, result
//! - `health_endpoint_up` (gauge): 1=healthy, 0=unhealthy
//! - `health_endpoint_retention_seconds` (gauge): current check interval
//! - `health_transitions_total` (counter): health flips by address, target state
//!
//! # Design Decisions
//! - Without an installed recorder every call is a cheap no-op
//! - Labels are the endpoint address only; names live in the logs

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `address`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(address: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(address).install()?;
    tracing::info!(address = %address, "Metrics endpoint listening");
    Ok(())
}

fn result_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

/// Record one completed check and the retention chosen after it.
pub fn record_check(address: SocketAddr, healthy: bool, retention: Duration) {
    let address = address.to_string();
    ::metrics::counter!("health_checks_total", "address" => address.clone(), "result" => result_label(healthy))
        .increment(1);
    ::metrics::gauge!("health_endpoint_up", "address" => address.clone()).set(if healthy { 1.0 } else { 0.0 });
    ::metrics::gauge!("health_endpoint_retention_seconds", "address" => address).set(retention.as_secs_f64());
}

/// Record a change of health.
pub fn record_transition(address: SocketAddr, healthy: bool) {
    ::metrics::counter!(
        "health_transitions_total",
        "address" => address.to_string(),
        "to" => result_label(healthy)
    )
    .increment(1);
}
