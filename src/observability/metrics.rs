//! Metrics collection and exposition.
//!
//! # Metrics
//! - `chainsync_transfers_submitted_total` (counter): by network
//! - `chainsync_transfers_confirmed_total` (counter): by network
//! - `chainsync_transfers_failed_total` (counter): by network, stage
//! - `chainsync_faucet_grants_total` (counter): by network
//! - `chainsync_rpc_failovers_total` (counter): by network
//! - `chainsync_network_health` (gauge): 1=reachable, 0=unreachable
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations behind the metrics facade)
//! - Recording works with or without an installed exporter; without one
//!   the calls are no-ops, so the library never forces an endpoint

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter on `addr`.
///
/// Must be called from within a tokio runtime. Failure is logged, not
/// fatal; the process runs without exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_transfer_submitted(network: &str) {
    counter!("chainsync_transfers_submitted_total", "network" => network.to_string())
        .increment(1);
}

pub fn record_transfer_confirmed(network: &str) {
    counter!("chainsync_transfers_confirmed_total", "network" => network.to_string())
        .increment(1);
}

pub fn record_transfer_failed(network: &str, stage: &'static str) {
    counter!(
        "chainsync_transfers_failed_total",
        "network" => network.to_string(),
        "stage" => stage
    )
    .increment(1);
}

pub fn record_faucet_grant(network: &str) {
    counter!("chainsync_faucet_grants_total", "network" => network.to_string()).increment(1);
}

pub fn record_rpc_failover(network: &str) {
    counter!("chainsync_rpc_failovers_total", "network" => network.to_string()).increment(1);
}

pub fn record_network_health(network: &str, healthy: bool) {
    gauge!("chainsync_network_health", "network" => network.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
