//! In-memory [`NetworkRpc`] implementation for tests and local development.
//!
//! Records every raw submission so tests can assert on exactly how many
//! transactions reached the network, and exposes knobs for the failure
//! paths (submission errors, withheld receipts, reverts).

use alloy::primitives::{keccak256, Address, TxHash, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::chain::rpc::NetworkRpc;
use crate::chain::types::{ChainError, ChainResult, ReceiptInfo};

#[derive(Debug)]
pub struct MockRpc {
    chain_id: u64,
    block_number: AtomicU64,
    gas_price: AtomicU64,
    balances: Mutex<HashMap<Address, U256>>,
    submissions: Mutex<Vec<Vec<u8>>>,
    debit_on_submit: Mutex<Option<(Address, U256)>>,
    fail_submissions: AtomicBool,
    withhold_receipts: AtomicBool,
    revert_transactions: AtomicBool,
}

impl MockRpc {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            block_number: AtomicU64::new(1),
            gas_price: AtomicU64::new(1),
            balances: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            debit_on_submit: Mutex::new(None),
            fail_submissions: AtomicBool::new(false),
            withhold_receipts: AtomicBool::new(false),
            revert_transactions: AtomicBool::new(false),
        }
    }

    pub fn set_balance(&self, address: Address, balance: U256) {
        self.balances.lock().unwrap().insert(address, balance);
    }

    pub fn set_gas_price(&self, gas_price: u64) {
        self.gas_price.store(gas_price, Ordering::SeqCst);
    }

    pub fn set_block_number(&self, block: u64) {
        self.block_number.store(block, Ordering::SeqCst);
    }

    /// Subtract `amount` from `address` after every accepted submission,
    /// so a later balance query observes the spend.
    pub fn debit_on_submit(&self, address: Address, amount: U256) {
        *self.debit_on_submit.lock().unwrap() = Some((address, amount));
    }

    /// Make every subsequent submission fail with an RPC error.
    pub fn fail_submissions(&self) {
        self.fail_submissions.store(true, Ordering::SeqCst);
    }

    /// Keep receipts pending forever (confirmation-timeout path).
    pub fn withhold_receipts(&self) {
        self.withhold_receipts.store(true, Ordering::SeqCst);
    }

    /// Undo [`withhold_receipts`](Self::withhold_receipts); pending
    /// transactions become confirmable on the next poll.
    pub fn release_receipts(&self) {
        self.withhold_receipts.store(false, Ordering::SeqCst);
    }

    /// Report every mined transaction as reverted.
    pub fn revert_transactions(&self) {
        self.revert_transactions.store(true, Ordering::SeqCst);
    }

    /// Number of raw transactions that reached the mock network.
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<Vec<u8>> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkRpc for MockRpc {
    async fn chain_id(&self) -> ChainResult<u64> {
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> ChainResult<u64> {
        Ok(self.block_number.load(Ordering::SeqCst))
    }

    async fn balance(&self, address: Address) -> ChainResult<U256> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn transaction_count(&self, _address: Address) -> ChainResult<u64> {
        Ok(self.submissions.lock().unwrap().len() as u64)
    }

    async fn gas_price(&self) -> ChainResult<u128> {
        Ok(self.gas_price.load(Ordering::SeqCst) as u128)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> ChainResult<TxHash> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("injected submission failure".to_string()));
        }
        let hash = keccak256(raw);
        self.submissions.lock().unwrap().push(raw.to_vec());
        if let Some((address, amount)) = *self.debit_on_submit.lock().unwrap() {
            let mut balances = self.balances.lock().unwrap();
            let balance = balances.entry(address).or_insert(U256::ZERO);
            *balance = balance.saturating_sub(amount);
        }
        Ok(hash)
    }

    async fn transaction_receipt(&self, _tx_hash: TxHash) -> ChainResult<Option<ReceiptInfo>> {
        if self.withhold_receipts.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(ReceiptInfo {
            status: !self.revert_transactions.load(Ordering::SeqCst),
            block_number: Some(self.block_number.load(Ordering::SeqCst)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_address_has_zero_balance() {
        let rpc = MockRpc::new(1);
        let balance = rpc.balance(Address::repeat_byte(0x77)).await.unwrap();
        assert_eq!(balance, U256::ZERO);
    }

    #[tokio::test]
    async fn test_submissions_are_recorded() {
        let rpc = MockRpc::new(1);
        assert_eq!(rpc.submission_count(), 0);
        rpc.send_raw_transaction(&[0xf8, 0x01]).await.unwrap();
        assert_eq!(rpc.submission_count(), 1);
        assert_eq!(rpc.submissions()[0], vec![0xf8, 0x01]);
    }

    #[tokio::test]
    async fn test_injected_submission_failure() {
        let rpc = MockRpc::new(1);
        rpc.fail_submissions();
        let result = rpc.send_raw_transaction(&[0x01]).await;
        assert!(matches!(result, Err(ChainError::Rpc(_))));
        assert_eq!(rpc.submission_count(), 0);
    }
}
