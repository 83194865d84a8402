//! ChainSync payment core: deterministic per-user wallets and
//! balance-checked transfers across multiple EVM networks.

pub mod chain;
pub mod config;
pub mod observability;
pub mod service;

pub use chain::registry::ChainRegistry;
pub use chain::types::{ChainError, ChainResult, TransferResult};
pub use config::ChainSyncConfig;
pub use service::WalletService;
