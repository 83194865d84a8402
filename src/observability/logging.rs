//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Level comes from `RUST_LOG` when set, otherwise from config
//! - Initialized once per process, by the binaries only

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber.
///
/// `default_level` is the configured fallback used when `RUST_LOG` is not
/// set. Calling this twice is a caller bug and will panic, matching the
/// tracing contract.
pub fn init(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(format!("chainsync={default_level}"))
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
