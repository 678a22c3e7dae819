//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolver outcomes, labelled
//!   `outcome` = `found` | `method_not_allowed` | `not_found`
//! - `router_negotiations_total` (counter): requests answered or rewritten by
//!   a negotiation stage, labelled `stage`
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::info;

pub fn record_resolution(outcome: &'static str) {
    ::metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_negotiation(stage: &'static str) {
    ::metrics::counter!("router_negotiations_total", "stage" => stage).increment(1);
}

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_resolution("found");
        record_negotiation("not_found");
    }
}
