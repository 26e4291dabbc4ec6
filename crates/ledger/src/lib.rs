//! Account ledger storage
//!
//! This crate provides the ledger owned by a single participant process:
//! - Accounts with signed decimal balances, loaded from a flat record file
//! - Atomic whole-file persistence after every applied transfer
//! - Holds that reserve funds between a commit vote and the final decision
//!
//! Record format, one account per line: `<balance> <account name>`. Only the
//! first space is a delimiter, so names may contain spaces.

mod account;
mod error;
mod hold;
mod ledger;
mod store;

pub use account::Account;
pub use error::{LedgerError, Result};
pub use hold::{Hold, HoldBook, HoldCheck};
pub use ledger::Ledger;
pub use store::{AppliedTransfer, HoldDecision, LedgerStore};

pub use proven_common::Amount;
