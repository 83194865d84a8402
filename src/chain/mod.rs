//! Multi-chain payment core.
//!
//! # Data Flow
//! ```text
//! (derivation secret, external identity)
//!     → derive.rs (deterministic key derivation)
//!     → account.rs (address, balance, signing)
//!     → transfer.rs (balance gate, submit, confirm)
//!     → faucet.rs / bridge.rs (privileged flows)
//! registry.rs holds one rpc handle per configured network and
//! dispatches the above by network name.
//! ```
//!
//! # Security Constraints
//! - Keys are re-derived on demand, never persisted or logged
//! - Privileged keys (faucet, bridge operator) come from environment
//!   variables only
//! - Every RPC call has a configurable timeout

pub mod account;
pub mod bridge;
pub mod derive;
pub mod faucet;
pub mod mock;
pub mod registry;
pub mod rpc;
pub mod transfer;
pub mod types;

pub use account::ChainAccount;
pub use bridge::{BridgeCoordinator, BridgeTransfer, LegStatus};
pub use faucet::FaucetDispenser;
pub use registry::{ChainRegistry, Network, NetworkParams};
pub use rpc::{NetworkRpc, RpcClient};
pub use transfer::TransferOrchestrator;
pub use types::{ChainError, ChainResult, NetworkStatus, TransferResult};
