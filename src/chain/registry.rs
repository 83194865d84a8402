//! Multi-chain registry: one network handle per configured chain.
//!
//! Populated once at startup from configuration. A network absent from
//! configuration is simply unavailable; lookups fail with
//! `UnsupportedNetwork` and never fall back to another chain. Handles are
//! independent; there is no cross-network consistency guarantee.

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::chain::account::ChainAccount;
use crate::chain::bridge::BridgeCoordinator;
use crate::chain::derive::{derive_signer, signer_from_hex};
use crate::chain::faucet::FaucetDispenser;
use crate::chain::rpc::{NetworkRpc, RpcClient};
use crate::chain::transfer::TransferOrchestrator;
use crate::chain::types::{ChainError, ChainResult, NetworkStatus};
use crate::config::schema::{ChainSyncConfig, BRIDGE_KEY_ENV, FAUCET_KEY_ENV};
use crate::observability::metrics;

/// Per-network operating parameters.
#[derive(Debug, Clone)]
pub struct NetworkParams {
    /// Confirmation depth; inclusion counts as the first confirmation.
    pub confirmation_blocks: u32,
    /// Bounded wait for confirmation before surfacing a timeout.
    pub confirmation_timeout_secs: u64,
    /// Receipt polling cadence.
    pub poll_interval_ms: u64,
    /// Safety margin applied to the network-reported gas price.
    pub gas_price_multiplier: f64,
    /// Ceiling protecting against gas price spikes.
    pub max_gas_price_gwei: u64,
    /// Gas units charged for a simple value transfer.
    pub transfer_gas_limit: u64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            confirmation_blocks: 1,
            confirmation_timeout_secs: 60,
            poll_interval_ms: 2_000,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
            transfer_gas_limit: 21_000,
        }
    }
}

/// A live handle to one blockchain network.
///
/// The RPC connection is shared read-only across every account on the
/// network. The only mutable state is the per-address send-lock table.
pub struct Network {
    name: String,
    chain_id: u64,
    rpc: Arc<dyn NetworkRpc>,
    params: NetworkParams,
    /// Serializes sends per sender address (balance check + submit).
    send_locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl Network {
    pub fn new(
        name: impl Into<String>,
        chain_id: u64,
        rpc: Arc<dyn NetworkRpc>,
        params: NetworkParams,
    ) -> Self {
        Self {
            name: name.into(),
            chain_id,
            rpc,
            params,
            send_locks: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn rpc(&self) -> Arc<dyn NetworkRpc> {
        self.rpc.clone()
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// The send lock for one sender address, created on first use.
    pub fn send_lock(&self, address: Address) -> Arc<Mutex<()>> {
        self.send_locks
            .entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Verify the endpoint reports the configured chain id.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let actual = self.rpc.chain_id().await?;
        if actual != self.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.chain_id,
                actual,
            });
        }
        Ok(())
    }

    /// Probe the network and report a status snapshot.
    ///
    /// A failed probe reports `connected: false` rather than erroring;
    /// the network stays registered and may recover.
    pub async fn status(&self) -> NetworkStatus {
        match self.rpc.block_number().await {
            Ok(height) => {
                metrics::record_network_health(&self.name, true);
                NetworkStatus {
                    name: self.name.clone(),
                    connected: true,
                    block_height: Some(height),
                    chain_id: self.chain_id,
                }
            }
            Err(e) => {
                metrics::record_network_health(&self.name, false);
                tracing::warn!(network = %self.name, error = %e, "Network status probe failed");
                NetworkStatus {
                    name: self.name.clone(),
                    connected: false,
                    block_height: None,
                    chain_id: self.chain_id,
                }
            }
        }
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("name", &self.name)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Faucet configuration resolved at startup (key already parsed).
pub struct FaucetSettings {
    pub signer: PrivateKeySigner,
    pub default_amount: U256,
    pub min_balance_threshold: U256,
}

/// Bridge configuration resolved at startup.
pub struct BridgeSettings {
    pub bridge_address: Address,
    pub operator: PrivateKeySigner,
}

/// Holds one [`Network`] per supported chain and dispatches by name.
pub struct ChainRegistry {
    secret: String,
    default_network: String,
    networks: HashMap<String, Arc<Network>>,
    faucet: Option<FaucetSettings>,
    bridge: Option<Arc<BridgeCoordinator>>,
}

impl ChainRegistry {
    /// An empty registry; networks are added with [`register`](Self::register).
    pub fn new(secret: impl Into<String>, default_network: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            default_network: default_network.into(),
            networks: HashMap::new(),
            faucet: None,
            bridge: None,
        }
    }

    /// Build the registry from validated configuration.
    ///
    /// Reads the faucet and bridge operator keys from the environment when
    /// those features are enabled; a missing key is a startup error, not a
    /// runtime surprise.
    pub fn from_config(cfg: &ChainSyncConfig) -> ChainResult<Self> {
        let mut registry = Self::new(cfg.derivation.secret.clone(), cfg.default_network.clone());

        for net_cfg in &cfg.networks {
            let rpc = Arc::new(RpcClient::new(net_cfg)?);
            let network = Network::new(
                net_cfg.name.clone(),
                net_cfg.chain_id,
                rpc,
                net_cfg.params(),
            );
            registry.register(network);
        }

        if cfg.faucet.enabled {
            let key = std::env::var(FAUCET_KEY_ENV).map_err(|_| {
                ChainError::Config(format!("faucet enabled but {FAUCET_KEY_ENV} not set"))
            })?;
            registry.set_faucet(FaucetSettings {
                signer: signer_from_hex(&key)?,
                default_amount: U256::from(cfg.faucet.amount_wei),
                min_balance_threshold: U256::from(cfg.faucet.min_balance_wei),
            });
        }

        if cfg.bridge.enabled {
            let key = std::env::var(BRIDGE_KEY_ENV).map_err(|_| {
                ChainError::Config(format!("bridge enabled but {BRIDGE_KEY_ENV} not set"))
            })?;
            let bridge_address: Address = cfg.bridge.bridge_address.parse().map_err(|e| {
                ChainError::Config(format!(
                    "invalid bridge address '{}': {e}",
                    cfg.bridge.bridge_address
                ))
            })?;
            registry.set_bridge(BridgeSettings {
                bridge_address,
                operator: signer_from_hex(&key)?,
            });
        }

        tracing::info!(
            networks = registry.networks.len(),
            default_network = %registry.default_network,
            faucet = registry.faucet.is_some(),
            bridge = registry.bridge.is_some(),
            "Chain registry initialized"
        );

        Ok(registry)
    }

    pub fn register(&mut self, network: Network) {
        self.networks.insert(network.name().to_string(), Arc::new(network));
    }

    pub fn set_faucet(&mut self, settings: FaucetSettings) {
        self.faucet = Some(settings);
    }

    pub fn set_bridge(&mut self, settings: BridgeSettings) {
        self.bridge = Some(Arc::new(BridgeCoordinator::new(
            settings.bridge_address,
            settings.operator,
        )));
    }

    pub fn default_network(&self) -> &str {
        &self.default_network
    }

    pub fn network_names(&self) -> Vec<&str> {
        self.networks.keys().map(String::as_str).collect()
    }

    /// Look up a network by name; unknown names fail, no fallback.
    pub fn network(&self, name: &str) -> ChainResult<Arc<Network>> {
        self.networks
            .get(name)
            .cloned()
            .ok_or_else(|| ChainError::UnsupportedNetwork(name.to_string()))
    }

    /// Derive the account for an external identity on one network.
    pub fn account_for(&self, name: &str, external_id: &str) -> ChainResult<ChainAccount> {
        let network = self.network(name)?;
        let signer = derive_signer(&self.secret, external_id)?;
        Ok(ChainAccount::new(
            signer,
            network.rpc(),
            network.name(),
            network.chain_id(),
        ))
    }

    /// Transfer orchestrator bound to one network.
    pub fn orchestrator_for(&self, name: &str) -> ChainResult<TransferOrchestrator> {
        Ok(TransferOrchestrator::new(self.network(name)?))
    }

    /// Faucet dispenser bound to one network.
    pub fn faucet_for(&self, name: &str) -> ChainResult<FaucetDispenser> {
        let network = self.network(name)?;
        let settings = self
            .faucet
            .as_ref()
            .ok_or_else(|| ChainError::Config("faucet is not configured".to_string()))?;
        let account = ChainAccount::new(
            settings.signer.clone(),
            network.rpc(),
            network.name(),
            network.chain_id(),
        );
        Ok(FaucetDispenser::new(
            account,
            network,
            settings.default_amount,
            settings.min_balance_threshold,
        ))
    }

    pub fn bridge(&self) -> ChainResult<Arc<BridgeCoordinator>> {
        self.bridge
            .clone()
            .ok_or_else(|| ChainError::Config("bridge is not configured".to_string()))
    }

    /// Status snapshot for one network.
    pub async fn network_status(&self, name: &str) -> ChainResult<NetworkStatus> {
        Ok(self.network(name)?.status().await)
    }

    /// Verify every registered network reports its configured chain id.
    ///
    /// Mismatches and probe failures are logged and returned but do not
    /// tear the registry down; callers choose whether to abort.
    pub async fn verify_chains(&self) -> Vec<(String, ChainError)> {
        let mut failures = Vec::new();
        for (name, network) in &self.networks {
            if let Err(e) = network.verify_chain_id().await {
                tracing::warn!(network = %name, error = %e, "Chain verification failed");
                failures.push((name.clone(), e));
            }
        }
        failures
    }
}

impl std::fmt::Debug for ChainRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainRegistry")
            .field("default_network", &self.default_network)
            .field("networks", &self.networks.keys().collect::<Vec<_>>())
            .field("faucet", &self.faucet.is_some())
            .field("bridge", &self.bridge.is_some())
            .finish()
    }
}
