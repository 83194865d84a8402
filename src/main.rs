//! ChainSync payment core daemon.
//!
//! Loads configuration, builds the multi-chain registry, verifies each
//! endpoint's chain id, and keeps per-network health gauges fresh until
//! shutdown. The user-facing surfaces (bot, HTTP) live elsewhere and call
//! into the library; this process exists for operations: status, metrics,
//! and an early failure when configuration and reality disagree.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chainsync::chain::registry::ChainRegistry;
use chainsync::config::{load_config, ChainSyncConfig};
use chainsync::observability::{logging, metrics};

const DEFAULT_CONFIG_PATH: &str = "chainsync.toml";
const HEALTH_PROBE_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config: ChainSyncConfig = load_config(&config_path)?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        config = %config_path.display(),
        networks = config.networks.len(),
        default_network = %config.default_network,
        "chainsync starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(ChainRegistry::from_config(&config)?);

    // Verify each endpoint reports its configured chain id. Mismatches are
    // logged and the process keeps running, same as a temporarily
    // unreachable endpoint.
    let failures = registry.verify_chains().await;
    if failures.is_empty() {
        tracing::info!("All configured networks verified");
    }

    let mut probe = tokio::time::interval(HEALTH_PROBE_INTERVAL);
    loop {
        tokio::select! {
            _ = probe.tick() => {
                for name in registry.network_names() {
                    if let Ok(status) = registry.network_status(name).await {
                        tracing::debug!(
                            network = %status.name,
                            connected = status.connected,
                            block_height = ?status.block_height,
                            "Network probe"
                        );
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
