//! Error types for the ledger

use proven_common::Amount;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Unable to open account file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed account record on line {line}: {record:?}")]
    MalformedRecord { line: usize, record: String },

    #[error("Duplicate account {name:?} on line {line}")]
    DuplicateAccount { line: usize, name: String },

    #[error("No account named {name:?}")]
    UnknownAccount { name: String },

    #[error("Applying {amount} to account {name:?} with balance {balance} overflows")]
    BalanceOverflow {
        name: String,
        balance: Amount,
        amount: Amount,
    },

    #[error("Unable to persist account file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
