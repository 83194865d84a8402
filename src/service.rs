//! External interface operations over external identities.
//!
//! The outer layers (bot handlers, HTTP, whatever fronts this) speak in
//! messaging-platform identifiers and network names; this module resolves
//! them to accounts and dispatches to the chain core. All errors surface
//! typed; mapping them to user-facing text is the caller's problem.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::chain::bridge::BridgeTransfer;
use crate::chain::registry::ChainRegistry;
use crate::chain::types::{ChainError, ChainResult, NetworkStatus, TransferResult};

/// Response to a balance query.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceInfo {
    pub network: String,
    pub address: Address,
    pub balance: U256,
}

/// Operations the outer layers call, one per user-visible action.
pub struct WalletService {
    registry: Arc<ChainRegistry>,
}

impl WalletService {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    fn resolve_network<'a>(&'a self, network: Option<&'a str>) -> &'a str {
        network.unwrap_or_else(|| self.registry.default_network())
    }

    /// The deterministic address owned by an external identity.
    pub fn account_address(&self, external_id: &str, network: Option<&str>) -> ChainResult<Address> {
        let network = self.resolve_network(network);
        Ok(self.registry.account_for(network, external_id)?.address())
    }

    /// Balance and address for an external identity.
    pub async fn balance(
        &self,
        external_id: &str,
        network: Option<&str>,
    ) -> ChainResult<BalanceInfo> {
        let network = self.resolve_network(network);
        let account = self.registry.account_for(network, external_id)?;
        Ok(BalanceInfo {
            network: network.to_string(),
            address: account.address(),
            balance: account.balance().await?,
        })
    }

    /// Send value from one identity to a recipient on one network.
    ///
    /// The recipient is either a 0x-prefixed hex address or another
    /// external identity, which is then derived on the same network.
    pub async fn send(
        &self,
        from_external_id: &str,
        to: &str,
        amount: U256,
        network: Option<&str>,
    ) -> ChainResult<TransferResult> {
        let network = self.resolve_network(network);
        let from = self.registry.account_for(network, from_external_id)?;
        let recipient = self.resolve_recipient(to, network)?;
        self.registry
            .orchestrator_for(network)?
            .send(&from, recipient, amount)
            .await
    }

    /// Dispense a faucet grant to an external identity's address.
    pub async fn faucet(
        &self,
        external_id: &str,
        amount: Option<U256>,
        network: Option<&str>,
    ) -> ChainResult<TransferResult> {
        let network = self.resolve_network(network);
        let target = self.registry.account_for(network, external_id)?.address();
        self.registry.faucet_for(network)?.dispense(target, amount).await
    }

    /// Run a cross-network transfer as a two-leg saga.
    pub async fn bridge(
        &self,
        from_external_id: &str,
        to: &str,
        amount: U256,
        from_network: &str,
        to_network: &str,
    ) -> ChainResult<BridgeTransfer> {
        let coordinator = self.registry.bridge()?;
        let source = self.registry.network(from_network)?;
        let dest = self.registry.network(to_network)?;
        let sender = self.registry.account_for(from_network, from_external_id)?;
        let recipient = self.resolve_recipient(to, to_network)?;
        coordinator
            .execute(source, &sender, dest, recipient, amount)
            .await
    }

    /// Look up a recorded bridge transfer.
    pub fn bridge_status(&self, id: Uuid) -> ChainResult<BridgeTransfer> {
        self.registry
            .bridge()?
            .record(id)
            .ok_or_else(|| ChainError::InvalidInput(format!("unknown bridge transfer {id}")))
    }

    /// Status snapshot for one network.
    pub async fn network_status(&self, network: Option<&str>) -> ChainResult<NetworkStatus> {
        let network = self.resolve_network(network);
        self.registry.network_status(network).await
    }

    fn resolve_recipient(&self, to: &str, network: &str) -> ChainResult<Address> {
        if to.starts_with("0x") || to.starts_with("0X") {
            to.parse().map_err(|e| {
                ChainError::InvalidInput(format!("invalid recipient address '{to}': {e}"))
            })
        } else {
            Ok(self.registry.account_for(network, to)?.address())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockRpc;
    use crate::chain::registry::{Network, NetworkParams};

    fn test_service() -> (Arc<MockRpc>, WalletService) {
        let rpc = Arc::new(MockRpc::new(31337));
        let params = NetworkParams {
            transfer_gas_limit: 1,
            gas_price_multiplier: 1.0,
            poll_interval_ms: 10,
            ..NetworkParams::default()
        };
        let mut registry = ChainRegistry::new("test-seed", "testnet");
        registry.register(Network::new("testnet", 31337, rpc.clone(), params));
        (rpc, WalletService::new(Arc::new(registry)))
    }

    #[tokio::test]
    async fn test_balance_includes_derived_address() {
        let (rpc, service) = test_service();
        let address = service.account_address("123456789", None).unwrap();
        rpc.set_balance(address, U256::from(77u64));

        let info = service.balance("123456789", None).await.unwrap();
        assert_eq!(info.address, address);
        assert_eq!(info.balance, U256::from(77u64));
        assert_eq!(info.network, "testnet");
    }

    #[tokio::test]
    async fn test_send_to_external_identity() {
        let (rpc, service) = test_service();
        let from_addr = service.account_address("alice-id", None).unwrap();
        let to_addr = service.account_address("bob-id", None).unwrap();
        rpc.set_balance(from_addr, U256::from(1_000u64));

        let result = service
            .send("alice-id", "bob-id", U256::from(60u64), None)
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.from, from_addr);
        assert_eq!(result.to, to_addr);
    }

    #[tokio::test]
    async fn test_send_to_hex_address() {
        let (rpc, service) = test_service();
        let from_addr = service.account_address("alice-id", None).unwrap();
        rpc.set_balance(from_addr, U256::from(1_000u64));

        let result = service
            .send(
                "alice-id",
                "0x00000000000000000000000000000000000000aa",
                U256::from(60u64),
                None,
            )
            .await
            .unwrap();
        assert!(result.success);
        let expected: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        assert_eq!(result.to, expected);
    }

    #[tokio::test]
    async fn test_malformed_recipient_rejected() {
        let (rpc, service) = test_service();
        let from_addr = service.account_address("alice-id", None).unwrap();
        rpc.set_balance(from_addr, U256::from(1_000u64));

        let result = service
            .send("alice-id", "0xnot-hex", U256::from(1u64), None)
            .await;
        assert!(matches!(result, Err(ChainError::InvalidInput(_))));
        assert_eq!(rpc.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_network_surfaces() {
        let (_, service) = test_service();
        let result = service.balance("alice-id", Some("nonexistent-network")).await;
        assert!(matches!(result, Err(ChainError::UnsupportedNetwork(_))));
    }

    #[tokio::test]
    async fn test_bridge_unconfigured() {
        let (_, service) = test_service();
        let result = service
            .bridge("alice-id", "bob-id", U256::from(1u64), "testnet", "testnet")
            .await;
        assert!(matches!(result, Err(ChainError::Config(_))));
    }
}
