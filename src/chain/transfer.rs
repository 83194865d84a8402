//! Transfer orchestration: balance gate, fee, submission, confirmation.
//!
//! # Ordering
//! Each step is a hard precondition for the next:
//! 1. Balance query
//! 2. Fee computation (fixed gas units x current network gas price)
//! 3. Insufficient-funds gate; nothing is submitted past this point on failure
//! 4. Sign and submit
//! 5. Bounded confirmation wait (single confirmation depth)
//!
//! Not idempotent: two calls with identical arguments produce two distinct
//! transfers. Callers needing idempotence must de-duplicate upstream.

use alloy::primitives::{Address, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::chain::account::ChainAccount;
use crate::chain::registry::Network;
use crate::chain::types::{ChainError, ChainResult, TransferResult};
use crate::observability::metrics;

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Orchestrates value transfers on one network.
pub struct TransferOrchestrator {
    network: Arc<Network>,
}

impl TransferOrchestrator {
    pub fn new(network: Arc<Network>) -> Self {
        Self { network }
    }

    /// Submit a value transfer and wait for one confirmation.
    ///
    /// Precondition failures (bad amount, insufficient funds, gas price cap)
    /// are returned as `Err` and guarantee zero network submission. Failures
    /// at or after submission are reported inside the [`TransferResult`],
    /// which then carries the transaction hash where one exists.
    ///
    /// Sends from the same address are serialized: the balance check and the
    /// submission happen under a per-address lock, so two concurrent calls
    /// cannot both pass the gate against the same stale balance. The lock is
    /// released once the transaction is submitted; the confirmation wait does
    /// not block the sender's next send.
    pub async fn send(
        &self,
        from: &ChainAccount,
        to: Address,
        amount: U256,
    ) -> ChainResult<TransferResult> {
        if amount.is_zero() {
            return Err(ChainError::InvalidInput(
                "transfer amount must be positive".to_string(),
            ));
        }

        let send_lock = self.network.send_lock(from.address());
        let guard = send_lock.lock().await;

        let balance = from.balance().await?;
        let gas_price = self.adjusted_gas_price().await?;
        let params = self.network.params();

        let fee = U256::from(gas_price) * U256::from(params.transfer_gas_limit);
        let needed = amount
            .checked_add(fee)
            .ok_or_else(|| ChainError::InvalidInput("amount overflows U256".to_string()))?;

        if balance < needed {
            return Err(ChainError::InsufficientFunds {
                needed,
                available: balance,
            });
        }

        let nonce = self.network.rpc().transaction_count(from.address()).await?;
        let raw = from.signed_transfer(to, amount, nonce, gas_price, params.transfer_gas_limit)?;

        let tx_hash = match self.network.rpc().send_raw_transaction(&raw).await {
            Ok(hash) => hash,
            Err(e) => {
                metrics::record_transfer_failed(self.network.name(), "submission");
                tracing::warn!(
                    network = %self.network.name(),
                    from = %from.address(),
                    to = %to,
                    error = %e,
                    "Transfer submission failed"
                );
                return Ok(TransferResult::failed(
                    None,
                    from.address(),
                    to,
                    amount,
                    e.to_string(),
                ));
            }
        };

        // The chain has the transaction; waiting for its receipt must not
        // hold up the sender's next submission.
        drop(guard);

        metrics::record_transfer_submitted(self.network.name());
        tracing::info!(
            network = %self.network.name(),
            tx_hash = %tx_hash,
            from = %from.address(),
            to = %to,
            amount = %amount,
            nonce = nonce,
            "Transfer submitted"
        );

        match self.wait_for_confirmation(tx_hash).await {
            Ok(block_number) => {
                metrics::record_transfer_confirmed(self.network.name());
                tracing::info!(
                    network = %self.network.name(),
                    tx_hash = %tx_hash,
                    block_number = block_number,
                    "Transfer confirmed"
                );
                Ok(TransferResult::confirmed(tx_hash, from.address(), to, amount))
            }
            Err(e) => {
                metrics::record_transfer_failed(self.network.name(), "confirmation");
                tracing::warn!(
                    network = %self.network.name(),
                    tx_hash = %tx_hash,
                    error = %e,
                    "Transfer not confirmed"
                );
                Ok(TransferResult::failed(
                    Some(tx_hash),
                    from.address(),
                    to,
                    amount,
                    e.to_string(),
                ))
            }
        }
    }

    /// Current gas price with the configured safety multiplier, checked
    /// against the configured ceiling.
    async fn adjusted_gas_price(&self) -> ChainResult<u128> {
        let gas_price = self.network.rpc().gas_price().await?;
        let params = self.network.params();

        let gas_price_gwei = gas_price / WEI_PER_GWEI;
        if gas_price_gwei > params.max_gas_price_gwei as u128 {
            return Err(ChainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: params.max_gas_price_gwei,
            });
        }

        Ok((gas_price as f64 * params.gas_price_multiplier) as u128)
    }

    /// Poll for the receipt until the transaction reaches the required
    /// confirmation depth, bounded by the configured timeout.
    ///
    /// Expiry means the transaction may still confirm later; the caller
    /// must re-query status rather than resubmit.
    async fn wait_for_confirmation(&self, tx_hash: alloy::primitives::TxHash) -> ChainResult<u64> {
        let params = self.network.params();
        let required = params.confirmation_blocks;
        let timeout_duration = Duration::from_secs(params.confirmation_timeout_secs);
        let poll_interval = Duration::from_millis(params.poll_interval_ms);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.network.rpc().transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status {
                    return Err(ChainError::Reverted(tx_hash.to_string()));
                }

                let current_block = self.network.rpc().block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // Inclusion itself counts as the first confirmation.
                let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

                if confirmations >= required {
                    return Ok(tx_block);
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(ChainError::ConfirmationTimeout {
                tx_hash,
                timeout_secs: params.confirmation_timeout_secs,
            }),
        }
    }
}
