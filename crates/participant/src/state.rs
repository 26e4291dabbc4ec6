//! Participant protocol states

use proven_common::Amount;
use std::fmt;

/// Change promised by a commit vote, kept until the decision arrives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransfer {
    pub account: String,
    pub amount: Amount,
}

/// Per-session protocol state
///
/// `ABORT` and `COMMIT` are momentary outcomes, not states: after either the
/// session is finished and a new connection starts again in `Init`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParticipantState {
    /// Waiting for a vote request
    #[default]
    Init,
    /// Voted commit, waiting for the global decision
    Ready(PendingTransfer),
}

impl ParticipantState {
    pub fn name(&self) -> &'static str {
        match self {
            ParticipantState::Init => "INIT",
            ParticipantState::Ready(_) => "READY",
        }
    }
}

impl fmt::Display for ParticipantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
