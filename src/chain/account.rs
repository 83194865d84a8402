//! Chain account handle: a derived key bound to one network.
//!
//! # Security
//! - Signers are held in memory only; nothing is persisted
//! - Keys are never logged or serialized

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::signers::local::PrivateKeySigner;
use std::sync::Arc;

use crate::chain::rpc::NetworkRpc;
use crate::chain::types::{ChainError, ChainResult};

/// A derived key together with a connection to one network.
///
/// Cheap to construct and re-derived on demand; the address is computed
/// once at construction and cached for the handle's lifetime.
#[derive(Clone)]
pub struct ChainAccount {
    signer: PrivateKeySigner,
    rpc: Arc<dyn NetworkRpc>,
    network: String,
    chain_id: u64,
    address: Address,
}

impl ChainAccount {
    pub fn new(
        signer: PrivateKeySigner,
        rpc: Arc<dyn NetworkRpc>,
        network: impl Into<String>,
        chain_id: u64,
    ) -> Self {
        let address = signer.address();
        Self {
            signer,
            rpc,
            network: network.into(),
            chain_id,
            address,
        }
    }

    /// Deterministic public address for the underlying key.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Name of the network this account is bound to.
    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Current spendable balance in wei.
    ///
    /// Fails with [`ChainError::Rpc`] on RPC failure; no internal retry,
    /// the caller decides whether to retry or surface the error.
    pub async fn balance(&self) -> ChainResult<U256> {
        self.rpc.balance(self.address).await
    }

    /// Build, sign, and EIP-2718-encode a simple value transfer.
    ///
    /// Legacy transaction with EIP-155 replay protection via the bound
    /// chain id. Returns raw bytes ready for `send_raw_transaction`.
    pub fn signed_transfer(
        &self,
        to: Address,
        amount: U256,
        nonce: u64,
        gas_price: u128,
        gas_limit: u64,
    ) -> ChainResult<Vec<u8>> {
        let mut tx = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(to),
            value: amount,
            input: Bytes::new(),
        };

        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| ChainError::Wallet(format!("signing failed: {e}")))?;

        let envelope = TxEnvelope::Legacy(tx.into_signed(signature));
        Ok(envelope.encoded_2718())
    }
}

impl std::fmt::Debug for ChainAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainAccount")
            .field("address", &self.address)
            .field("network", &self.network)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::derive::{derive_signer, signer_from_hex};
    use crate::chain::mock::MockRpc;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_account() -> ChainAccount {
        let signer = signer_from_hex(TEST_PRIVATE_KEY).unwrap();
        ChainAccount::new(signer, Arc::new(MockRpc::new(31337)), "local", 31337)
    }

    #[test]
    fn test_address_matches_signer() {
        let account = test_account();
        assert_eq!(
            account.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_derived_account_address_stable() {
        let rpc = Arc::new(MockRpc::new(1));
        let a = ChainAccount::new(
            derive_signer("test-seed", "123456789").unwrap(),
            rpc.clone(),
            "mainnet",
            1,
        );
        let b = ChainAccount::new(
            derive_signer("test-seed", "123456789").unwrap(),
            rpc,
            "mainnet",
            1,
        );
        assert_eq!(a.address(), b.address());
    }

    #[tokio::test]
    async fn test_balance_reads_network() {
        let rpc = Arc::new(MockRpc::new(31337));
        let account = ChainAccount::new(
            signer_from_hex(TEST_PRIVATE_KEY).unwrap(),
            rpc.clone(),
            "local",
            31337,
        );
        rpc.set_balance(account.address(), U256::from(100u64));
        assert_eq!(account.balance().await.unwrap(), U256::from(100u64));
    }

    #[test]
    fn test_signed_transfer_is_rlp_list() {
        let account = test_account();
        let raw = account
            .signed_transfer(
                Address::repeat_byte(0x22),
                U256::from(1_000u64),
                0,
                1_000_000_000,
                21_000,
            )
            .unwrap();
        // A signed legacy transaction is an RLP list, so the first byte is
        // in the list range and the payload carries the 65-byte signature.
        assert!(raw[0] >= 0xc0);
        assert!(raw.len() > 65);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let account = test_account();
        let to = Address::repeat_byte(0x22);
        let a = account
            .signed_transfer(to, U256::from(5u64), 7, 1_000, 21_000)
            .unwrap();
        let b = account
            .signed_transfer(to, U256::from(5u64), 7, 1_000, 21_000)
            .unwrap();
        assert_eq!(a, b);
    }
}
