//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! with defaults on every field so minimal configs work.

use serde::{Deserialize, Serialize};

use crate::chain::registry::NetworkParams;

/// Environment variable overriding the derivation secret.
pub const DERIVATION_SECRET_ENV: &str = "CHAINSYNC_DERIVATION_SECRET";
/// Environment variable holding the faucet's privileged private key.
pub const FAUCET_KEY_ENV: &str = "CHAINSYNC_FAUCET_PRIVATE_KEY";
/// Environment variable holding the bridge operator's private key.
pub const BRIDGE_KEY_ENV: &str = "CHAINSYNC_BRIDGE_PRIVATE_KEY";

/// Development-only default secret; validation warns when it is in use.
pub const DEFAULT_DERIVATION_SECRET: &str = "chainsync-dev-secret";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChainSyncConfig {
    /// Network used when a request names none.
    pub default_network: String,

    /// Key derivation settings.
    pub derivation: DerivationConfig,

    /// Supported networks; a chain absent here is unavailable.
    pub networks: Vec<NetworkConfig>,

    /// Faucet settings.
    pub faucet: FaucetConfig,

    /// Bridge settings.
    pub bridge: BridgeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Key derivation configuration.
///
/// The secret is read once at startup and never rotated at runtime:
/// addresses are not persisted anywhere, so rotating the secret silently
/// orphans every previously derived address.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Process-wide derivation secret. `CHAINSYNC_DERIVATION_SECRET`
    /// overrides the file value.
    pub secret: String,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_DERIVATION_SECRET.to_string(),
        }
    }
}

/// Configuration for one blockchain network.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Registry key (e.g. "sepolia", "base-sepolia").
    pub name: String,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g. 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Confirmation depth; inclusion counts as the first confirmation.
    pub confirmation_blocks: u32,

    /// Bounded confirmation wait in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling cadence in milliseconds.
    pub poll_interval_ms: u64,

    /// Gas price multiplier (1.0 = as reported, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Gas units for a simple value transfer.
    pub transfer_gas_limit: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let params = NetworkParams::default();
        Self {
            name: String::new(),
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 0,
            rpc_timeout_secs: 10,
            confirmation_blocks: params.confirmation_blocks,
            confirmation_timeout_secs: params.confirmation_timeout_secs,
            poll_interval_ms: params.poll_interval_ms,
            gas_price_multiplier: params.gas_price_multiplier,
            max_gas_price_gwei: params.max_gas_price_gwei,
            transfer_gas_limit: params.transfer_gas_limit,
        }
    }
}

impl NetworkConfig {
    /// Operating parameters for the chain core.
    pub fn params(&self) -> NetworkParams {
        NetworkParams {
            confirmation_blocks: self.confirmation_blocks,
            confirmation_timeout_secs: self.confirmation_timeout_secs,
            poll_interval_ms: self.poll_interval_ms,
            gas_price_multiplier: self.gas_price_multiplier,
            max_gas_price_gwei: self.max_gas_price_gwei,
            transfer_gas_limit: self.transfer_gas_limit,
        }
    }
}

/// Faucet configuration. The privileged key is NOT part of the file; it is
/// read from `CHAINSYNC_FAUCET_PRIVATE_KEY`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// Enable the faucet.
    pub enabled: bool,

    /// Default grant size in wei. `u64` because the TOML deserializer has
    /// no 128-bit integer support; the maximum (~18.4 ether) is ample for
    /// testnet grants.
    pub amount_wei: u64,

    /// Targets holding at least this balance are refused.
    pub min_balance_wei: u64,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            amount_wei: 10_000_000_000_000_000, // 0.01 ether
            min_balance_wei: 1_000_000_000_000_000, // 0.001 ether
        }
    }
}

/// Bridge configuration. The operator key comes from
/// `CHAINSYNC_BRIDGE_PRIVATE_KEY`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Enable cross-network transfers.
    pub enabled: bool,

    /// Address receiving leg-1 funds on the source network.
    pub bridge_address: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
