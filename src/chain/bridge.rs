//! Cross-network transfers as an explicit two-leg saga.
//!
//! A "cross-chain" transfer here is two independent, causally-unlinked
//! same-chain transfers: the sender pays the bridge address on the source
//! network, then the bridge operator pays the recipient on the destination
//! network. There is no atomicity between the legs. A leg-2 failure leaves
//! leg 1 confirmed, and the record says so rather than hiding it.

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::chain::account::ChainAccount;
use crate::chain::registry::Network;
use crate::chain::transfer::TransferOrchestrator;
use crate::chain::types::{ChainResult, TransferResult};

/// Outcome of one leg of a bridge transfer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LegStatus {
    /// Not yet attempted.
    Pending,
    /// Confirmed on its network.
    Confirmed { tx_hash: alloy::primitives::TxHash },
    /// Submission or confirmation failed.
    Failed { error: String },
}

impl LegStatus {
    fn from_result(result: &ChainResult<TransferResult>) -> Self {
        match result {
            Ok(r) if r.success => LegStatus::Confirmed {
                tx_hash: r.tx_hash.unwrap_or_default(),
            },
            Ok(r) => LegStatus::Failed {
                error: r
                    .error
                    .clone()
                    .unwrap_or_else(|| "transfer failed".to_string()),
            },
            Err(e) => LegStatus::Failed {
                error: e.to_string(),
            },
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, LegStatus::Confirmed { .. })
    }
}

/// Durable record of one bridge transfer attempt.
#[derive(Debug, Clone, Serialize)]
pub struct BridgeTransfer {
    pub id: Uuid,
    pub source_network: String,
    pub dest_network: String,
    pub sender: Address,
    pub recipient: Address,
    pub amount: U256,
    pub leg1: LegStatus,
    pub leg2: LegStatus,
}

impl BridgeTransfer {
    /// Both legs confirmed.
    pub fn completed(&self) -> bool {
        self.leg1.is_confirmed() && self.leg2.is_confirmed()
    }

    /// Leg 1 confirmed but leg 2 did not: funds sit at the bridge address
    /// on the source network and need operator intervention.
    pub fn stranded(&self) -> bool {
        self.leg1.is_confirmed() && matches!(self.leg2, LegStatus::Failed { .. })
    }
}

/// Executes bridge sagas and keeps their records queryable by id.
pub struct BridgeCoordinator {
    bridge_address: Address,
    operator: PrivateKeySigner,
    records: DashMap<Uuid, BridgeTransfer>,
}

impl BridgeCoordinator {
    pub fn new(bridge_address: Address, operator: PrivateKeySigner) -> Self {
        Self {
            bridge_address,
            operator,
            records: DashMap::new(),
        }
    }

    pub fn bridge_address(&self) -> Address {
        self.bridge_address
    }

    /// Look up a recorded transfer by id.
    pub fn record(&self, id: Uuid) -> Option<BridgeTransfer> {
        self.records.get(&id).map(|r| r.clone())
    }

    /// Records where leg 1 confirmed but leg 2 failed.
    pub fn stranded_transfers(&self) -> Vec<BridgeTransfer> {
        self.records
            .iter()
            .filter(|r| r.stranded())
            .map(|r| r.clone())
            .collect()
    }

    /// Run the two-leg saga.
    ///
    /// Leg 1 moves `amount` from the sender to the bridge address on the
    /// source network. Only if it confirms does leg 2 move `amount` from
    /// the operator account to the recipient on the destination network.
    /// The returned record always reflects exactly how far the saga got;
    /// partial failure is an outcome, not an error.
    pub async fn execute(
        &self,
        source: Arc<Network>,
        sender: &ChainAccount,
        dest: Arc<Network>,
        recipient: Address,
        amount: U256,
    ) -> ChainResult<BridgeTransfer> {
        let id = Uuid::new_v4();
        let mut record = BridgeTransfer {
            id,
            source_network: source.name().to_string(),
            dest_network: dest.name().to_string(),
            sender: sender.address(),
            recipient,
            amount,
            leg1: LegStatus::Pending,
            leg2: LegStatus::Pending,
        };
        self.records.insert(id, record.clone());

        tracing::info!(
            bridge_id = %id,
            source = %record.source_network,
            dest = %record.dest_network,
            amount = %amount,
            "Starting bridge transfer"
        );

        // Leg 1: sender -> bridge address on the source network.
        let leg1 = TransferOrchestrator::new(source)
            .send(sender, self.bridge_address, amount)
            .await;
        record.leg1 = LegStatus::from_result(&leg1);
        self.records.insert(id, record.clone());

        if !record.leg1.is_confirmed() {
            tracing::warn!(bridge_id = %id, "Bridge leg 1 failed, leg 2 not attempted");
            return Ok(record);
        }

        // Leg 2: operator -> recipient on the destination network. No
        // rollback of leg 1 if this fails; the record shows the stranding.
        let operator_account = ChainAccount::new(
            self.operator.clone(),
            dest.rpc(),
            dest.name(),
            dest.chain_id(),
        );
        let leg2 = TransferOrchestrator::new(dest)
            .send(&operator_account, recipient, amount)
            .await;
        record.leg2 = LegStatus::from_result(&leg2);
        self.records.insert(id, record.clone());

        if record.completed() {
            tracing::info!(bridge_id = %id, "Bridge transfer completed");
        } else {
            tracing::warn!(bridge_id = %id, "Bridge transfer stranded after leg 1");
        }

        Ok(record)
    }
}

impl std::fmt::Debug for BridgeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeCoordinator")
            .field("bridge_address", &self.bridge_address)
            .field("records", &self.records.len())
            .finish()
    }
}
