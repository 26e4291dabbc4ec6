//! Two-phase commit participant service
//!
//! # Usage
//!
//! ```bash
//! participant <port> <account-file> <log-file>
//! ```
//!
//! The account file holds one `<balance> <account name>` record per line and
//! is rewritten in full after every committed transfer. The log file is
//! truncated at startup and receives a copy of every log line.

use anyhow::{Context, Result};
use clap::Parser;
use proven_common::{LogFileMode, TelemetryConfig, init_telemetry};
use proven_ledger::LedgerStore;
use proven_participant::{DEFAULT_BIND_HOST, ParticipantConfig, ParticipantServer};
use std::path::PathBuf;
use tracing::info;

/// Participant guarding one account ledger
#[derive(Parser, Debug)]
#[command(name = "participant")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Port to accept coordinator connections on (1-65535)
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Account record file
    account_file: PathBuf,

    /// Audit log file
    log_file: PathBuf,

    /// Interface to bind
    #[arg(long, default_value = DEFAULT_BIND_HOST)]
    bind_host: String,

    /// Log level filter (overrides RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ParticipantConfig::new(cli.port, cli.account_file, cli.log_file)
        .with_host(cli.bind_host);

    let _log_guard = init_telemetry(
        &TelemetryConfig::new(&config.log_file, LogFileMode::Truncate)
            .with_log_level(cli.log_level),
    )
    .context("Unable to create/open log file")?;

    let store = LedgerStore::open(&config.account_file).context("Unable to open account file")?;
    info!(
        "Loaded {} accounts from {}",
        store.snapshot().len(),
        config.account_file.display()
    );

    let server = ParticipantServer::bind(&config, store).await?;
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    server.serve_with_shutdown(shutdown).await?;

    Ok(())
}
