//! Booking verifier
//!
//! Drives one booking through the whole platform: login, property selection,
//! booking request, on-chain payment and confirmation.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────┐   ┌──────────────┐   ┌──────────────────────────────┐
//!   │  config  │──▶│   scenario   │──▶│ api (platform gateway, HTTP) │
//!   └──────────┘   │    runner    │   └──────────────────────────────┘
//!                  │              │   ┌──────────────────────────────┐
//!                  │              │──▶│ booking (select, discover,   │
//!                  │              │   │          confirm)            │
//!                  │              │   └──────────────────────────────┘
//!                  │              │   ┌──────────────────────────────┐
//!                  │              │──▶│ payments → blockchain (RPC)  │
//!                  └──────────────┘   └──────────────────────────────┘
//!          cross-cutting: observability (logs, metrics), resilience (polling)
//! ```
//!
//! # Exit codes
//! 0 success, 2 configuration, 10-16 one per failed scenario step.

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use booking_verifier::api::PlatformClient;
use booking_verifier::auth::subject_of;
use booking_verifier::blockchain::Wallet;
use booking_verifier::config::{load_config, LogFormat, VerifierConfig};
use booking_verifier::observability::{logging, metrics};
use booking_verifier::payments::ChainGateway;
use booking_verifier::scenario::Scenario;

const CONFIG_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "booking-verifier")]
#[command(about = "End-to-end booking and payment verification", long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, env = "BOOKING_VERIFIER_CONFIG", default_value = "config/minikube.toml")]
    config: PathBuf,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full booking and payment scenario
    Run,
    /// Validate configuration and chain connectivity
    Check,
    /// Print the subject of a bearer token
    DecodeToken {
        /// The token, without the "Bearer " prefix
        token: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Commands::DecodeToken { token }) = &cli.command {
        return match subject_of(token) {
            Ok(subject) => {
                println!("{}", subject);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}: {}", cli.config.display(), e);
            return ExitCode::from(CONFIG_EXIT);
        }
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if cli.json_logs {
        config.observability.log_format = LogFormat::Json;
    }

    logging::init_logging(&config.observability);
    tracing::info!(config = %cli.config.display(), "booking-verifier v{} starting", env!("CARGO_PKG_VERSION"));

    let prometheus = config
        .observability
        .metrics_path
        .as_ref()
        .and_then(|_| metrics::init_metrics());

    let code = match cli.command.unwrap_or(Commands::Run) {
        Commands::Check => check(&config).await,
        _ => run(&config).await,
    };

    if let (Some(handle), Some(path)) = (&prometheus, &config.observability.metrics_path) {
        if let Err(e) = metrics::write_snapshot(handle, path) {
            tracing::error!(path = %path.display(), error = %e, "Failed to write metrics snapshot");
        }
    }

    ExitCode::from(code)
}

async fn run(config: &VerifierConfig) -> u8 {
    let gateway = match ChainGateway::from_config(&config.blockchain) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!(error = %e, "Invalid blockchain configuration");
            return CONFIG_EXIT;
        }
    };
    let api = match PlatformClient::new(&config.api) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Invalid API configuration");
            return CONFIG_EXIT;
        }
    };

    match Scenario::new(config, api, gateway).run().await {
        Ok(report) => {
            for warning in &report.warnings {
                tracing::warn!(warning = %warning, "Completed with warning");
            }
            println!("{}", report);
            0
        }
        Err(e) => {
            tracing::error!(step = e.step().as_str(), error = %e, "Scenario failed");
            if let Some(hint) = e.hint() {
                tracing::error!("{}", hint);
            }
            e.exit_code()
        }
    }
}

async fn check(config: &VerifierConfig) -> u8 {
    let gateway = match ChainGateway::from_config(&config.blockchain) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!(error = %e, "Invalid blockchain configuration");
            return CONFIG_EXIT;
        }
    };

    let signer = config
        .blockchain
        .tenant_private_key
        .as_deref()
        .map(|key| Wallet::from_private_key(key, config.blockchain.chain_id));
    let tenant_wallet = config.tenant.wallet_address.parse::<Address>();
    if let (Some(Ok(wallet)), Ok(expected)) = (signer, tenant_wallet) {
        if let Err(e) = wallet.ensure_address(expected) {
            tracing::error!(error = %e, "Tenant private key does not control the tenant wallet");
            return CONFIG_EXIT;
        }
    }

    let client = gateway.client();
    if let Err(e) = client.verify_chain_id().await {
        tracing::error!(rpc_url = %config.blockchain.rpc_url, error = %e, "Chain check failed");
        return 10;
    }
    match client.get_block_number().await {
        Ok(block_number) => {
            tracing::info!(
                chain_id = config.blockchain.chain_id,
                block_number,
                signer = %gateway.signer_address(),
                "Configuration OK"
            );
            0
        }
        Err(e) => {
            tracing::error!(rpc_url = %config.blockchain.rpc_url, error = %e, "Chain check failed");
            10
        }
    }
}
