//! JSON-RPC access with timeout and failover handling.
//!
//! # Responsibilities
//! - Define the narrow RPC surface the payment core needs
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Bound every call with a timeout
//!
//! The [`NetworkRpc`] trait is the seam between the transfer logic and the
//! wire: production uses [`RpcClient`] (alloy providers), tests use
//! [`crate::chain::mock::MockRpc`].

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::types::{ChainError, ChainResult, ReceiptInfo};
use crate::config::schema::NetworkConfig;
use crate::observability::metrics;

/// The operations the payment core needs from a blockchain network.
///
/// Intentionally small: balance, fee price, raw submission, receipt,
/// block height, nonce, chain id. No event filtering, no state reads.
#[async_trait]
pub trait NetworkRpc: Send + Sync {
    /// Chain ID reported by the endpoint.
    async fn chain_id(&self) -> ChainResult<u64>;

    /// Latest block number.
    async fn block_number(&self) -> ChainResult<u64>;

    /// Spendable balance of an address in wei.
    async fn balance(&self, address: Address) -> ChainResult<U256>;

    /// Transaction count (next nonce) for an address.
    async fn transaction_count(&self, address: Address) -> ChainResult<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> ChainResult<u128>;

    /// Broadcast a signed, EIP-2718-encoded transaction.
    async fn send_raw_transaction(&self, raw: &[u8]) -> ChainResult<TxHash>;

    /// Receipt for a submitted transaction, `None` while pending.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> ChainResult<Option<ReceiptInfo>>;
}

/// Alloy-backed RPC client with failover support.
#[derive(Clone)]
pub struct RpcClient {
    /// Network name, for logs and metrics only.
    network: String,
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a client for one network from its configuration.
    ///
    /// Connecting is lazy; an unreachable endpoint fails at the first call,
    /// not here. An unparseable primary URL is an error, unparseable
    /// failover URLs are skipped with a warning.
    pub fn new(cfg: &NetworkConfig) -> ChainResult<Self> {
        let primary_url: url::Url = cfg.rpc_url.parse().map_err(|e| {
            ChainError::Config(format!("invalid RPC URL '{}': {}", cfg.rpc_url, e))
        })?;

        let mut providers: Vec<Arc<dyn Provider + Send + Sync>> = Vec::new();
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url))
                as Arc<dyn Provider + Send + Sync>,
        );

        for url_str in &cfg.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url))
                    as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(network = %cfg.name, url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        Ok(Self {
            network: cfg.name.clone(),
            providers,
            timeout_duration: Duration::from_secs(cfg.rpc_timeout_secs),
        })
    }

    /// Run `call` against each provider in order until one answers.
    async fn with_failover<T, F, Fut>(&self, op: &'static str, call: F) -> ChainResult<T>
    where
        F: Fn(Arc<dyn Provider + Send + Sync>) -> Fut,
        Fut: std::future::Future<Output = Result<T, alloy::transports::TransportError>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, call(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(
                        network = %self.network,
                        provider_idx = i,
                        op = op,
                        error = %e,
                        "RPC error, trying next provider"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        network = %self.network,
                        provider_idx = i,
                        op = op,
                        "RPC timeout, trying next provider"
                    );
                }
            }
            if i + 1 < self.providers.len() {
                metrics::record_rpc_failover(&self.network);
            }
        }
        Err(ChainError::Rpc(format!(
            "all RPC providers failed for {op} on {}",
            self.network
        )))
    }
}

#[async_trait]
impl NetworkRpc for RpcClient {
    async fn chain_id(&self) -> ChainResult<u64> {
        self.with_failover("chain_id", |p| async move { p.get_chain_id().await })
            .await
    }

    async fn block_number(&self) -> ChainResult<u64> {
        self.with_failover("block_number", |p| async move { p.get_block_number().await })
            .await
    }

    async fn balance(&self, address: Address) -> ChainResult<U256> {
        self.with_failover("balance", |p| async move { p.get_balance(address).await })
            .await
    }

    async fn transaction_count(&self, address: Address) -> ChainResult<u64> {
        self.with_failover("transaction_count", |p| async move {
            p.get_transaction_count(address).await
        })
        .await
    }

    async fn gas_price(&self) -> ChainResult<u128> {
        self.with_failover("gas_price", |p| async move { p.get_gas_price().await })
            .await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> ChainResult<TxHash> {
        let raw = raw.to_vec();
        self.with_failover("send_raw_transaction", move |p| {
            let raw = raw.clone();
            async move {
                let pending = p.send_raw_transaction(&raw).await?;
                Ok(*pending.tx_hash())
            }
        })
        .await
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> ChainResult<Option<ReceiptInfo>> {
        self.with_failover("transaction_receipt", |p| async move {
            let receipt = p.get_transaction_receipt(tx_hash).await?;
            Ok(receipt.map(|r| ReceiptInfo {
                status: r.status(),
                block_number: r.block_number,
            }))
        })
        .await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("network", &self.network)
            .field("providers", &self.providers.len())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::NetworkConfig;

    fn test_config() -> NetworkConfig {
        NetworkConfig {
            name: "local".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337, // Anvil default
            rpc_timeout_secs: 1,
            ..NetworkConfig::default()
        }
    }

    #[tokio::test]
    async fn test_client_creation_is_lazy() {
        // Creation should succeed even if the RPC endpoint is unreachable.
        let client = RpcClient::new(&test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_primary_url_rejected() {
        let mut cfg = test_config();
        cfg.rpc_url = "not a url".to_string();
        let result = RpcClient::new(&cfg);
        assert!(matches!(result, Err(ChainError::Config(_))));
    }

    #[tokio::test]
    async fn test_all_providers_failing_reports_rpc_error() {
        // Nothing listens on this port; the call should exhaust providers.
        let mut cfg = test_config();
        cfg.rpc_url = "http://127.0.0.1:59999".to_string();
        cfg.failover_urls = vec!["http://127.0.0.1:59998".to_string()];

        let client = RpcClient::new(&cfg).unwrap();
        let result = client.block_number().await;
        assert!(matches!(result, Err(ChainError::Rpc(_))));
    }
}
