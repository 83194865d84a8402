//! Faucet dispenser: a privileged account that funds new users.
//!
//! The balance-threshold guard is advisory only: it stops repeat draining
//! by the same address, not a user who derives a fresh identity. Identity
//! binding is out of scope.

use alloy::primitives::{Address, U256};
use std::sync::Arc;

use crate::chain::account::ChainAccount;
use crate::chain::registry::Network;
use crate::chain::transfer::TransferOrchestrator;
use crate::chain::types::{ChainError, ChainResult, TransferResult};
use crate::observability::metrics;

pub struct FaucetDispenser {
    /// The faucet's own privileged account.
    account: ChainAccount,
    network: Arc<Network>,
    /// Grant size when the caller does not specify one.
    default_amount: U256,
    /// Targets at or above this balance are refused.
    min_balance_threshold: U256,
}

impl FaucetDispenser {
    pub fn new(
        account: ChainAccount,
        network: Arc<Network>,
        default_amount: U256,
        min_balance_threshold: U256,
    ) -> Self {
        Self {
            account,
            network,
            default_amount,
            min_balance_threshold,
        }
    }

    /// Address of the privileged faucet account.
    pub fn address(&self) -> Address {
        self.account.address()
    }

    /// Send a grant to `target`, refusing targets that already hold at
    /// least the configured threshold.
    ///
    /// The threshold check happens before any submission; on
    /// [`ChainError::AlreadyFunded`] no transfer is attempted.
    pub async fn dispense(
        &self,
        target: Address,
        amount: Option<U256>,
    ) -> ChainResult<TransferResult> {
        let balance = self.network.rpc().balance(target).await?;
        if balance >= self.min_balance_threshold {
            return Err(ChainError::AlreadyFunded {
                address: target,
                balance,
                threshold: self.min_balance_threshold,
            });
        }

        let amount = amount.unwrap_or(self.default_amount);
        tracing::info!(
            network = %self.network.name(),
            target = %target,
            amount = %amount,
            "Dispensing faucet grant"
        );

        let result = TransferOrchestrator::new(self.network.clone())
            .send(&self.account, target, amount)
            .await?;

        if result.success {
            metrics::record_faucet_grant(self.network.name());
        }
        Ok(result)
    }
}

impl std::fmt::Debug for FaucetDispenser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaucetDispenser")
            .field("address", &self.account.address())
            .field("network", &self.network.name())
            .field("default_amount", &self.default_amount)
            .field("min_balance_threshold", &self.min_balance_threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::derive::signer_from_hex;
    use crate::chain::mock::MockRpc;
    use crate::chain::registry::NetworkParams;

    const FAUCET_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_faucet(threshold: u64) -> (Arc<MockRpc>, FaucetDispenser) {
        let rpc = Arc::new(MockRpc::new(31337));
        let params = NetworkParams {
            transfer_gas_limit: 1,
            gas_price_multiplier: 1.0,
            poll_interval_ms: 10,
            ..NetworkParams::default()
        };
        let network = Arc::new(Network::new("testnet", 31337, rpc.clone(), params));
        let account = ChainAccount::new(
            signer_from_hex(FAUCET_KEY).unwrap(),
            rpc.clone(),
            "testnet",
            31337,
        );
        rpc.set_balance(account.address(), U256::from(1_000_000u64));
        let faucet = FaucetDispenser::new(
            account,
            network,
            U256::from(100u64),
            U256::from(threshold),
        );
        (rpc, faucet)
    }

    #[tokio::test]
    async fn test_already_funded_target_refused() {
        // Target balance 5, threshold 1.
        let (rpc, faucet) = test_faucet(1);
        let target = Address::repeat_byte(0x33);
        rpc.set_balance(target, U256::from(5u64));

        let result = faucet.dispense(target, None).await;
        assert!(matches!(result, Err(ChainError::AlreadyFunded { .. })));
        assert_eq!(rpc.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let (rpc, faucet) = test_faucet(10);
        let target = Address::repeat_byte(0x33);
        rpc.set_balance(target, U256::from(10u64));

        let result = faucet.dispense(target, None).await;
        assert!(matches!(result, Err(ChainError::AlreadyFunded { .. })));
    }

    #[tokio::test]
    async fn test_underfunded_target_receives_one_grant() {
        let (rpc, faucet) = test_faucet(10);
        let target = Address::repeat_byte(0x33);
        rpc.set_balance(target, U256::from(3u64));

        let result = faucet.dispense(target, None).await.unwrap();
        assert!(result.success);
        assert_eq!(result.amount, U256::from(100u64));
        assert_eq!(result.to, target);
        assert_eq!(rpc.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_explicit_amount_overrides_default() {
        let (rpc, faucet) = test_faucet(10);
        let target = Address::repeat_byte(0x44);

        let result = faucet
            .dispense(target, Some(U256::from(42u64)))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.amount, U256::from(42u64));
        assert_eq!(rpc.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_drained_faucet_surfaces_insufficient_funds() {
        let (rpc, faucet) = test_faucet(10);
        rpc.set_balance(faucet.address(), U256::from(1u64));
        let target = Address::repeat_byte(0x55);

        let result = faucet.dispense(target, None).await;
        assert!(matches!(result, Err(ChainError::InsufficientFunds { .. })));
        assert_eq!(rpc.submission_count(), 0);
    }
}
