//! Votes, the global decision and the outcome of a run

use proven_protocol::{CoordinatorMessage, ParticipantResponse};
use std::fmt;

/// A participant's answer to a vote request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Commit,
    Abort,
}

impl Vote {
    /// Anything other than a well-formed `VOTE-COMMIT` counts as an abort vote
    pub fn from_reply(reply: &str) -> Self {
        match ParticipantResponse::parse(reply) {
            Ok(ParticipantResponse::VoteCommit) => Vote::Commit,
            _ => Vote::Abort,
        }
    }
}

/// The single commit point of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalDecision {
    Commit,
    Abort,
}

impl GlobalDecision {
    /// Commit iff there is at least one vote and every vote is a commit
    pub fn from_votes(votes: &[Vote]) -> Self {
        if !votes.is_empty() && votes.iter().all(|v| *v == Vote::Commit) {
            GlobalDecision::Commit
        } else {
            GlobalDecision::Abort
        }
    }

    pub fn message(&self) -> CoordinatorMessage {
        match self {
            GlobalDecision::Commit => CoordinatorMessage::GlobalCommit,
            GlobalDecision::Abort => CoordinatorMessage::GlobalAbort,
        }
    }
}

impl fmt::Display for GlobalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Result of one coordinator run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub decision: GlobalDecision,

    /// Every participant that voted commit acknowledged the decision
    pub acknowledged: bool,
}

impl TransactionOutcome {
    pub fn committed(&self) -> bool {
        self.decision == GlobalDecision::Commit
    }

    /// Final line written to the audit log
    pub fn summary(&self) -> &'static str {
        match (self.acknowledged, self.decision) {
            (false, _) => "Error: ACK not received. This should not occur.",
            (true, GlobalDecision::Commit) => "Transaction committed",
            (true, GlobalDecision::Abort) => "Transaction aborted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_from_reply() {
        assert_eq!(Vote::from_reply("VOTE-COMMIT"), Vote::Commit);
        assert_eq!(Vote::from_reply("VOTE-ABORT"), Vote::Abort);
        assert_eq!(Vote::from_reply("ACK"), Vote::Abort);
        assert_eq!(Vote::from_reply("vote-commit"), Vote::Abort);
        assert_eq!(Vote::from_reply(""), Vote::Abort);
    }

    #[test]
    fn test_decision_requires_unanimous_commit() {
        use Vote::*;

        assert_eq!(
            GlobalDecision::from_votes(&[Commit, Commit]),
            GlobalDecision::Commit
        );
        assert_eq!(
            GlobalDecision::from_votes(&[Commit, Abort]),
            GlobalDecision::Abort
        );
        assert_eq!(
            GlobalDecision::from_votes(&[Abort, Commit]),
            GlobalDecision::Abort
        );
        assert_eq!(GlobalDecision::from_votes(&[]), GlobalDecision::Abort);
    }

    #[test]
    fn test_outcome_summary() {
        let committed = TransactionOutcome {
            decision: GlobalDecision::Commit,
            acknowledged: true,
        };
        assert!(committed.committed());
        assert_eq!(committed.summary(), "Transaction committed");

        let aborted = TransactionOutcome {
            decision: GlobalDecision::Abort,
            acknowledged: true,
        };
        assert!(!aborted.committed());
        assert_eq!(aborted.summary(), "Transaction aborted");

        let anomaly = TransactionOutcome {
            decision: GlobalDecision::Commit,
            acknowledged: false,
        };
        assert!(anomaly.committed());
        assert_eq!(
            anomaly.summary(),
            "Error: ACK not received. This should not occur."
        );
    }

    #[test]
    fn test_decision_wire_format() {
        assert_eq!(GlobalDecision::Commit.to_string(), "GLOBAL-COMMIT");
        assert_eq!(GlobalDecision::Abort.to_string(), "GLOBAL-ABORT");
    }
}
