//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Malformed identity, address, or non-positive amount.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// RPC connection or request failed. Never retried internally.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Balance check failed before submission. No transaction was sent.
    #[error("insufficient funds: need {needed} wei, have {available} wei")]
    InsufficientFunds { needed: U256, available: U256 },

    /// Transaction submitted but not confirmed within the bounded wait.
    /// The transaction may still land; callers must re-query, not resubmit.
    #[error("transaction {tx_hash} not confirmed within {timeout_secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, timeout_secs: u64 },

    /// Faucet guard: the target already holds at least the threshold.
    #[error("address {address} already holds {balance} wei (threshold {threshold} wei)")]
    AlreadyFunded {
        address: Address,
        balance: U256,
        threshold: U256,
    },

    /// Network name absent from the registry. No fallback is attempted.
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),

    /// Invalid private key format or derivation error.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Transaction was included but reverted on-chain.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// Missing or inconsistent configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Minimal receipt view returned by the RPC seam.
///
/// Only the fields the confirmation loop needs; the full receipt stays
/// inside the RPC client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptInfo {
    /// True if the transaction executed successfully.
    pub status: bool,
    /// Block the transaction was included in, if mined.
    pub block_number: Option<u64>,
}

/// Outcome of one transfer attempt. Immutable after creation; not
/// persisted here, callers may log or store it.
#[derive(Debug, Clone, Serialize)]
pub struct TransferResult {
    pub success: bool,
    pub tx_hash: Option<TxHash>,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub error: Option<String>,
}

impl TransferResult {
    /// A transfer that was submitted and reached the required depth.
    pub fn confirmed(tx_hash: TxHash, from: Address, to: Address, amount: U256) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash),
            from,
            to,
            amount,
            error: None,
        }
    }

    /// A transfer that failed at or after submission.
    pub fn failed(
        tx_hash: Option<TxHash>,
        from: Address,
        to: Address,
        amount: U256,
        error: String,
    ) -> Self {
        Self {
            success: false,
            tx_hash,
            from,
            to,
            amount,
            error: Some(error),
        }
    }
}

/// Status snapshot of one registered network.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkStatus {
    pub name: String,
    pub connected: bool,
    pub block_height: Option<u64>,
    pub chain_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(1u64);
        assert_eq!(chain_id.0, 1);
        assert_eq!(u64::from(chain_id), 1);
    }

    #[test]
    fn test_error_display() {
        let err = ChainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = ChainError::InsufficientFunds {
            needed: U256::from(61u64),
            available: U256::from(10u64),
        };
        assert!(err.to_string().contains("61"));
        assert!(err.to_string().contains("10"));

        let err = ChainError::UnsupportedNetwork("nonexistent-network".to_string());
        assert!(err.to_string().contains("nonexistent-network"));
    }

    #[test]
    fn test_transfer_result_constructors() {
        let from = Address::ZERO;
        let to = Address::repeat_byte(0x11);
        let amount = U256::from(60u64);

        let ok = TransferResult::confirmed(TxHash::ZERO, from, to, amount);
        assert!(ok.success);
        assert!(ok.error.is_none());
        assert_eq!(ok.amount, amount);

        let bad = TransferResult::failed(None, from, to, amount, "boom".to_string());
        assert!(!bad.success);
        assert!(bad.tx_hash.is_none());
        assert_eq!(bad.error.as_deref(), Some("boom"));
    }
}
