//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{ChainSyncConfig, DERIVATION_SECRET_ENV};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, apply environment overrides, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<ChainSyncConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ChainSyncConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Secrets never live in the config file if the environment provides them.
fn apply_env_overrides(config: &mut ChainSyncConfig) {
    if let Ok(secret) = std::env::var(DERIVATION_SECRET_ENV) {
        if !secret.is_empty() {
            config.derivation.secret = secret;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/chainsync.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_valid_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("chainsync-loader-test.toml");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
            default_network = "local"

            [[networks]]
            name = "local"
            rpc_url = "http://localhost:8545"
            chain_id = 31337
            "#
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.default_network, "local");
        assert_eq!(config.networks[0].chain_id, 31337);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_config_fails_validation() {
        let dir = std::env::temp_dir();
        let path = dir.join("chainsync-loader-invalid.toml");
        let mut file = fs::File::create(&path).unwrap();
        // No networks at all.
        write!(file, "default_network = \"local\"").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        fs::remove_file(&path).ok();
    }
}
