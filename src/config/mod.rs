//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides for secrets)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ChainSyncConfig (validated, immutable)
//!     → ChainRegistry::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart, because
//!   rotating the derivation secret orphans every derived address
//! - All fields have defaults to allow minimal configs
//! - Private keys are never file fields; they come from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ChainSyncConfig, FaucetConfig, NetworkConfig};
