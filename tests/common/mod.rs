//! Shared fixtures for the integration suite: registries and services
//! wired to the in-memory mock RPC.

use std::sync::Arc;

use alloy::primitives::U256;
use chainsync::chain::derive::signer_from_hex;
use chainsync::chain::mock::MockRpc;
use chainsync::chain::registry::{ChainRegistry, FaucetSettings, Network, NetworkParams};
use chainsync::service::WalletService;

/// Anvil's first well-known account; used as the privileged faucet and
/// bridge operator key in tests.
pub const PRIVILEGED_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Parameters scaled for tests: fee comes out to exactly
/// `gas price (1 wei) x 1 gas unit = 1 wei`, and polling is fast.
pub fn test_params() -> NetworkParams {
    NetworkParams {
        transfer_gas_limit: 1,
        gas_price_multiplier: 1.0,
        poll_interval_ms: 10,
        confirmation_timeout_secs: 5,
        ..NetworkParams::default()
    }
}

/// A registry with a single mock-backed network named "testnet".
#[allow(dead_code)]
pub fn test_registry() -> (Arc<MockRpc>, ChainRegistry) {
    let rpc = Arc::new(MockRpc::new(31337));
    let mut registry = ChainRegistry::new("test-seed", "testnet");
    registry.register(Network::new("testnet", 31337, rpc.clone(), test_params()));
    (rpc, registry)
}

/// A service over [`test_registry`].
#[allow(dead_code)]
pub fn test_service() -> (Arc<MockRpc>, WalletService) {
    let (rpc, registry) = test_registry();
    (rpc, WalletService::new(Arc::new(registry)))
}

/// A service whose faucet account holds `faucet_balance` and refuses
/// targets holding `threshold` or more.
#[allow(dead_code)]
pub fn test_service_with_faucet(
    faucet_balance: u64,
    grant: u64,
    threshold: u64,
) -> (Arc<MockRpc>, WalletService) {
    let (rpc, mut registry) = test_registry();
    let signer = signer_from_hex(PRIVILEGED_KEY).unwrap();
    rpc.set_balance(signer.address(), U256::from(faucet_balance));
    registry.set_faucet(FaucetSettings {
        signer,
        default_amount: U256::from(grant),
        min_balance_threshold: U256::from(threshold),
    });
    (rpc, WalletService::new(Arc::new(registry)))
}
