//! Two-phase commit coordinator
//!
//! The coordinator drives a single transfer: it asks the origin participant to
//! vote on a debit and the destination participant to vote on the matching
//! credit, decides commit only if both vote commit, broadcasts that decision
//! and checks that it was acknowledged.
//!
//! The decision is the one commit point of the transaction. Transport failures
//! before it is made abort the run with an error; failures after it has been
//! sent are logged and reported through [`TransactionOutcome::acknowledged`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod intent;
pub mod transaction;

pub use config::CoordinatorConfig;
pub use coordinator::Coordinator;
pub use error::{CoordinatorError, Result};
pub use intent::{Endpoint, TransferIntent};
pub use transaction::{GlobalDecision, TransactionOutcome, Vote};
