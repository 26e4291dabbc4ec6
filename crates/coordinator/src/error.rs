//! Error types for the coordinator

use proven_transport::TransportError;
use thiserror::Error;

/// Coordinator error types
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Invalid transfer amount {0}: must be positive")]
    InvalidAmount(String),

    #[error("Participant {participant} failed before a decision was made: {source}")]
    Participant {
        participant: String,
        #[source]
        source: TransportError,
    },
}

/// Result type for coordinator operations
pub type Result<T> = std::result::Result<T, CoordinatorError>;
