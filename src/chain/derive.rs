//! Deterministic key derivation for external identities.
//!
//! Every user of the messaging front-end owns an address without ever
//! storing a key: the key is re-derived on demand from the process-wide
//! derivation secret and the user's platform identifier. Identical
//! `(secret, external_id)` inputs always yield the identical address.
//!
//! # Security
//! The SHA-256 digest of `"{secret}-{external_id}"` is used directly as the
//! secp256k1 private scalar, with no key stretching. Anyone holding the
//! secret can derive every user's key from their public identifier. This is
//! an accepted risk of the design, recorded in DESIGN.md.

use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use sha2::{Digest, Sha256};

use crate::chain::types::{ChainError, ChainResult};

/// Derive a signer for one external identity.
///
/// Pure function: no I/O, no randomness. Fails with
/// [`ChainError::InvalidInput`] on an empty secret or identity.
pub fn derive_signer(secret: &str, external_id: &str) -> ChainResult<PrivateKeySigner> {
    if external_id.trim().is_empty() {
        return Err(ChainError::InvalidInput(
            "external identity must not be empty".to_string(),
        ));
    }
    if secret.is_empty() {
        return Err(ChainError::InvalidInput(
            "derivation secret must not be empty".to_string(),
        ));
    }

    let mut digest = Sha256::digest(format!("{secret}-{external_id}").as_bytes());

    // A digest of zero or >= the curve order is not a valid scalar. The
    // probability is ~2^-128; rehashing keeps the scheme total without
    // breaking determinism.
    for _ in 0..2 {
        match PrivateKeySigner::from_bytes(&B256::from_slice(&digest)) {
            Ok(signer) => return Ok(signer),
            Err(_) => digest = Sha256::digest(digest),
        }
    }

    Err(ChainError::Wallet(
        "derived digest is not a valid secp256k1 scalar".to_string(),
    ))
}

/// Parse a hex-encoded private key (with or without 0x prefix).
///
/// Used for the faucet and bridge operator keys, which come from
/// environment variables rather than derivation.
pub fn signer_from_hex(private_key_hex: &str) -> ChainResult<PrivateKeySigner> {
    let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
    key_hex
        .parse()
        .map_err(|e| ChainError::Wallet(format!("invalid private key format: {e}")))
}
