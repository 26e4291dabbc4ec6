//! Error types for the participant

use proven_ledger::LedgerError;
use proven_transport::TransportError;
use thiserror::Error;

/// Result type for participant operations
pub type Result<T> = std::result::Result<T, ParticipantError>;

/// Participant errors
#[derive(Debug, Error)]
pub enum ParticipantError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("No hold recorded for pending transfer on account {account}")]
    HoldLost { account: String },

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParticipantError {
    /// Errors after which the ledger can no longer be trusted.
    ///
    /// A commit that could not be persisted stops the whole service; every
    /// other error only ends the session it occurred in.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParticipantError::Ledger(_))
    }
}
