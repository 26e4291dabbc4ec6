//! Two-phase commit coordinator
//!
//! # Usage
//!
//! ```bash
//! coordinator <log-file> <amount> \
//!     <origin-host> <origin-port> <origin-account> \
//!     <destination-host> <destination-port> <destination-account>
//! ```
//!
//! Runs a single transfer and exits. The log file is appended to so that
//! successive runs build up one audit trail.

use anyhow::{Context, Result};
use clap::Parser;
use proven_common::{Amount, LogFileMode, TelemetryConfig, init_telemetry};
use proven_coordinator::{Coordinator, CoordinatorConfig, Endpoint, TransferIntent};
use std::path::PathBuf;
use tracing::{error, info};

/// Coordinator moving funds between two participant ledgers
#[derive(Parser, Debug)]
#[command(name = "coordinator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Audit log file
    log_file: PathBuf,

    /// Amount to transfer, must be positive
    amount: Amount,

    /// Host of the participant holding the origin account
    origin_host: String,

    /// Port of the origin participant (1-65535)
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    origin_port: u16,

    /// Account to debit
    origin_account: String,

    /// Host of the participant holding the destination account
    destination_host: String,

    /// Port of the destination participant (1-65535)
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    destination_port: u16,

    /// Account to credit
    destination_account: String,

    /// Log level filter (overrides RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_telemetry(
        &TelemetryConfig::new(&cli.log_file, LogFileMode::Append).with_log_level(cli.log_level),
    )
    .context("Unable to create/open log file")?;

    let intent = TransferIntent::new(
        cli.amount,
        Endpoint::new(cli.origin_host, cli.origin_port, cli.origin_account),
        Endpoint::new(
            cli.destination_host,
            cli.destination_port,
            cli.destination_account,
        ),
    )
    .inspect_err(|err| error!("Rejected transaction: {}", err))?;
    let config = CoordinatorConfig::new(cli.log_file, intent);

    info!(
        "Transferring {} from {} at {} to {} at {}",
        config.intent.amount,
        config.intent.origin.account,
        config.intent.origin,
        config.intent.destination.account,
        config.intent.destination
    );

    // The outcome is already in the log; any decided transaction is a clean exit.
    Coordinator::new(config.intent).run_transaction().await?;

    Ok(())
}
