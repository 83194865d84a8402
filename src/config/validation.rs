//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default network must be configured)
//! - Validate value ranges (timeouts > 0, chain ids nonzero)
//!
//! Returns all validation errors, not just the first. Validation is a pure
//! function over the config and runs before it is accepted into the system.

use std::collections::HashSet;

use crate::config::schema::{ChainSyncConfig, DEFAULT_DERIVATION_SECRET};

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoNetworks,
    EmptyNetworkName,
    DuplicateNetworkName(String),
    InvalidRpcUrl { network: String, url: String },
    ZeroChainId(String),
    ZeroTimeout { network: String, field: &'static str },
    UnknownDefaultNetwork(String),
    EmptyDerivationSecret,
    FaucetZeroThreshold,
    FaucetZeroAmount,
    BridgeAddressInvalid(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoNetworks => {
                write!(f, "at least one network must be configured")
            }
            ValidationError::EmptyNetworkName => {
                write!(f, "network name must not be empty")
            }
            ValidationError::DuplicateNetworkName(name) => {
                write!(f, "duplicate network name '{name}'")
            }
            ValidationError::InvalidRpcUrl { network, url } => {
                write!(f, "network '{network}' has invalid RPC URL '{url}'")
            }
            ValidationError::ZeroChainId(name) => {
                write!(f, "network '{name}' has chain_id 0")
            }
            ValidationError::ZeroTimeout { network, field } => {
                write!(f, "network '{network}' has zero {field}")
            }
            ValidationError::UnknownDefaultNetwork(name) => {
                write!(f, "default_network '{name}' is not a configured network")
            }
            ValidationError::EmptyDerivationSecret => {
                write!(f, "derivation secret must not be empty")
            }
            ValidationError::FaucetZeroThreshold => {
                write!(f, "faucet.min_balance_wei must be positive when faucet is enabled")
            }
            ValidationError::FaucetZeroAmount => {
                write!(f, "faucet.amount_wei must be positive when faucet is enabled")
            }
            ValidationError::BridgeAddressInvalid(addr) => {
                write!(f, "bridge_address '{addr}' is not a valid address")
            }
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ChainSyncConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.networks.is_empty() {
        errors.push(ValidationError::NoNetworks);
    }

    let mut seen = HashSet::new();
    for net in &config.networks {
        if net.name.is_empty() {
            errors.push(ValidationError::EmptyNetworkName);
        } else if !seen.insert(net.name.as_str()) {
            errors.push(ValidationError::DuplicateNetworkName(net.name.clone()));
        }

        if net.rpc_url.parse::<url::Url>().is_err() {
            errors.push(ValidationError::InvalidRpcUrl {
                network: net.name.clone(),
                url: net.rpc_url.clone(),
            });
        }
        if net.chain_id == 0 {
            errors.push(ValidationError::ZeroChainId(net.name.clone()));
        }
        if net.rpc_timeout_secs == 0 {
            errors.push(ValidationError::ZeroTimeout {
                network: net.name.clone(),
                field: "rpc_timeout_secs",
            });
        }
        if net.confirmation_timeout_secs == 0 {
            errors.push(ValidationError::ZeroTimeout {
                network: net.name.clone(),
                field: "confirmation_timeout_secs",
            });
        }
    }

    // An empty default_network is caught here too: requests naming no
    // network would otherwise fail at runtime instead of at startup.
    if !seen.contains(config.default_network.as_str()) {
        errors.push(ValidationError::UnknownDefaultNetwork(
            config.default_network.clone(),
        ));
    }

    if config.derivation.secret.is_empty() {
        errors.push(ValidationError::EmptyDerivationSecret);
    } else if config.derivation.secret == DEFAULT_DERIVATION_SECRET {
        // Not an error, but worth shouting about outside development.
        tracing::warn!("derivation secret is the built-in development default");
    }

    if config.faucet.enabled {
        if config.faucet.min_balance_wei == 0 {
            errors.push(ValidationError::FaucetZeroThreshold);
        }
        if config.faucet.amount_wei == 0 {
            errors.push(ValidationError::FaucetZeroAmount);
        }
    }

    if config.bridge.enabled
        && config
            .bridge
            .bridge_address
            .parse::<alloy::primitives::Address>()
            .is_err()
    {
        errors.push(ValidationError::BridgeAddressInvalid(
            config.bridge.bridge_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::NetworkConfig;

    fn valid_config() -> ChainSyncConfig {
        ChainSyncConfig {
            default_network: "local".to_string(),
            networks: vec![NetworkConfig {
                name: "local".to_string(),
                chain_id: 31337,
                ..NetworkConfig::default()
            }],
            ..ChainSyncConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_config_collects_errors() {
        let config = ChainSyncConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoNetworks));
    }

    #[test]
    fn test_all_errors_reported_not_just_first() {
        let mut config = valid_config();
        config.networks.push(NetworkConfig {
            name: "local".to_string(), // duplicate
            chain_id: 0,               // and zero chain id
            ..NetworkConfig::default()
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateNetworkName("local".to_string())));
        assert!(errors.contains(&ValidationError::ZeroChainId("local".to_string())));
    }

    #[test]
    fn test_unknown_default_network() {
        let mut config = valid_config();
        config.default_network = "mainnet".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::UnknownDefaultNetwork("mainnet".to_string())));
    }

    #[test]
    fn test_missing_default_network_rejected() {
        let mut config = valid_config();
        config.default_network = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::UnknownDefaultNetwork(String::new())));
    }

    #[test]
    fn test_faucet_coherence() {
        let mut config = valid_config();
        config.faucet.enabled = true;
        config.faucet.min_balance_wei = 0;
        config.faucet.amount_wei = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::FaucetZeroThreshold));
        assert!(errors.contains(&ValidationError::FaucetZeroAmount));
    }

    #[test]
    fn test_bridge_address_checked_when_enabled() {
        let mut config = valid_config();
        config.bridge.enabled = true;
        config.bridge.bridge_address = "not-an-address".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BridgeAddressInvalid(
            "not-an-address".to_string()
        )));
    }
}
