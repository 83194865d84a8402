//! Operator CLI for the ChainSync payment core.
//!
//! Drives the library directly against the configured networks; useful for
//! smoke-testing derivation, faucet grants, and transfers without the
//! outer bot/HTTP layers.

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use chainsync::chain::registry::ChainRegistry;
use chainsync::config::load_config;
use chainsync::observability::logging;
use chainsync::service::WalletService;

#[derive(Parser)]
#[command(name = "chainsync-cli")]
#[command(about = "Management CLI for the ChainSync payment core", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "chainsync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report connectivity and block height per network
    Status {
        #[arg(long)]
        network: Option<String>,
    },
    /// Show the deterministic address for an external identity
    Address {
        #[arg(long)]
        id: String,
        #[arg(long)]
        network: Option<String>,
    },
    /// Query the balance of an external identity
    Balance {
        #[arg(long)]
        id: String,
        #[arg(long)]
        network: Option<String>,
    },
    /// Send value from an identity to an identity or 0x address
    Send {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Amount in wei
        #[arg(long)]
        amount: u128,
        #[arg(long)]
        network: Option<String>,
    },
    /// Dispense a faucet grant to an external identity
    Faucet {
        #[arg(long)]
        id: String,
        /// Amount in wei; defaults to the configured grant size
        #[arg(long)]
        amount: Option<u128>,
        #[arg(long)]
        network: Option<String>,
    },
    /// Run a cross-network transfer as a two-leg saga
    Bridge {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Amount in wei
        #[arg(long)]
        amount: u128,
        #[arg(long)]
        from_network: String,
        #[arg(long)]
        to_network: String,
    },
    /// Look up a recorded bridge transfer by id
    BridgeStatus {
        #[arg(long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("warn");
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let registry = Arc::new(ChainRegistry::from_config(&config)?);
    let service = WalletService::new(registry);

    match cli.command {
        Commands::Status { network } => {
            let status = service.network_status(network.as_deref()).await?;
            print_json(&status)?;
        }
        Commands::Address { id, network } => {
            let address = service.account_address(&id, network.as_deref())?;
            println!("{address}");
        }
        Commands::Balance { id, network } => {
            let info = service.balance(&id, network.as_deref()).await?;
            print_json(&info)?;
        }
        Commands::Send {
            from,
            to,
            amount,
            network,
        } => {
            let result = service
                .send(&from, &to, U256::from(amount), network.as_deref())
                .await?;
            print_json(&result)?;
        }
        Commands::Faucet { id, amount, network } => {
            let result = service
                .faucet(&id, amount.map(U256::from), network.as_deref())
                .await?;
            print_json(&result)?;
        }
        Commands::Bridge {
            from,
            to,
            amount,
            from_network,
            to_network,
        } => {
            let record = service
                .bridge(&from, &to, U256::from(amount), &from_network, &to_network)
                .await?;
            print_json(&record)?;
        }
        Commands::BridgeStatus { id } => {
            let record = service.bridge_status(id)?;
            print_json(&record)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
