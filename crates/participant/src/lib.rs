//! Two-phase commit participant
//!
//! A participant owns one account ledger. For each coordinator connection it
//! runs a small state machine:
//!
//! - `INIT`: waiting for `VOTE-REQUEST <account> <amount>`. The participant
//!   votes `VOTE-COMMIT` (and holds the funds) when the account exists and any
//!   debit is covered, otherwise `VOTE-ABORT` and the session ends.
//! - `READY`: waiting for the global decision. `GLOBAL-COMMIT` applies the
//!   held change and persists the ledger, `GLOBAL-ABORT` releases the hold.
//!   Either way the participant answers `ACK` and the session ends.
//!
//! State lives in the [`ParticipantSession`], one per connection. Sessions
//! share the ledger through a [`proven_ledger::LedgerStore`].

mod config;
mod error;
mod server;
mod session;
mod state;

pub use config::{DEFAULT_BIND_HOST, ParticipantConfig};
pub use error::{ParticipantError, Result};
pub use server::{ParticipantServer, run_session};
pub use session::{ParticipantSession, SessionStep};
pub use state::{ParticipantState, PendingTransfer};
