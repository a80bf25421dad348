//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webhook_connections_accepted_total` (counter): accepted connections
//! - `webhook_active_connections` (gauge): current connection count
//! - `webhook_lifecycle_state` (gauge): 0=idle, 1=running, 2=shutting down, 3=stopped

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::lifecycle::LifecycleState;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_connection_opened(active: u64) {
    counter!("webhook_connections_accepted_total").increment(1);
    gauge!("webhook_active_connections").set(active as f64);
}

pub fn record_connection_closed(active: u64) {
    gauge!("webhook_active_connections").set(active as f64);
}

pub fn record_lifecycle_state(state: LifecycleState) {
    gauge!("webhook_lifecycle_state").set(f64::from(state.code()));
}
