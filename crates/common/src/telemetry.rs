//! Console and audit-log telemetry
//!
//! Every `tracing` event is written twice: once to stdout for the operator and
//! once, without ANSI colouring, to the audit log file. The audit file is
//! written through a non-blocking appender whose worker flushes on drop, so the
//! returned [`TelemetryGuard`] must live for the duration of the process.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

/// How an existing audit log file is treated when it is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFileMode {
    /// Keep earlier lines and append after them
    Append,
    /// Start the file over
    Truncate,
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Audit log destination
    pub log_file: PathBuf,

    /// Whether to append to or truncate an existing log
    pub mode: LogFileMode,

    /// Default filter directive, used when `RUST_LOG` is not set
    pub log_level: String,
}

impl TelemetryConfig {
    pub fn new(log_file: impl Into<PathBuf>, mode: LogFileMode) -> Self {
        Self {
            log_file: log_file.into(),
            mode,
            log_level: "info".to_string(),
        }
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }
}

/// Telemetry errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Unable to create/open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Keeps the audit log writer alive; pending lines are flushed when dropped
#[must_use = "dropping the guard stops audit logging"]
pub struct TelemetryGuard {
    _audit: WorkerGuard,
}

/// Open the audit log file with the requested mode
pub fn open_log_file(path: &Path, mode: LogFileMode) -> Result<File, TelemetryError> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        LogFileMode::Append => options.append(true),
        LogFileMode::Truncate => options.write(true).truncate(true),
    };

    options.open(path).map_err(|source| TelemetryError::LogFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Install the global subscriber: stdout plus the audit log file
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let file = open_log_file(&config.log_file, config.mode)?;
    let (audit_writer, guard) = tracing_appender::non_blocking(file);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_writer(audit_writer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()?;

    Ok(TelemetryGuard { _audit: guard })
}
