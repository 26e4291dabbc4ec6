//! Common types for the Proven transfer services
//!
//! This crate defines:
//! - Signed decimal amounts used by ledgers and the wire protocol
//! - Session identifiers (UUIDv7-based) for correlating audit log lines
//! - Telemetry setup that mirrors every log line into an audit log file

mod amount;
mod session_id;
pub mod telemetry;

pub use amount::Amount;
pub use session_id::SessionId;
pub use telemetry::{LogFileMode, TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
