//! Typed messages for coordinator-to-participant communication

use proven_common::Amount;
use std::fmt;
use thiserror::Error;

pub const VOTE_REQUEST: &str = "VOTE-REQUEST";
pub const GLOBAL_COMMIT: &str = "GLOBAL-COMMIT";
pub const GLOBAL_ABORT: &str = "GLOBAL-ABORT";

/// Proposed change to one account, debit when the amount is negative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    pub account: String,
    pub amount: Amount,
}

/// Messages sent by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorMessage {
    /// Phase one: ask the participant to vote on a change
    VoteRequest(VoteRequest),
    /// Phase two: apply the held change
    GlobalCommit,
    /// Phase two: discard the held change
    GlobalAbort,
}

impl CoordinatorMessage {
    pub fn vote_request(account: impl Into<String>, amount: Amount) -> Self {
        Self::VoteRequest(VoteRequest {
            account: account.into(),
            amount,
        })
    }

    /// Parse a line received from the coordinator.
    ///
    /// `VOTE-REQUEST <account> <signed amount>` is split on its last space so
    /// that account names may themselves contain spaces. Decision messages
    /// must match exactly.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        match line {
            GLOBAL_COMMIT => return Ok(Self::GlobalCommit),
            GLOBAL_ABORT => return Ok(Self::GlobalAbort),
            _ => {}
        }

        let (verb, body) = match line.split_once(' ') {
            Some((verb, body)) => (verb, Some(body)),
            None => (line, None),
        };

        if verb != VOTE_REQUEST {
            return Err(ParseError::UnexpectedMessage(verb.to_string()));
        }

        let malformed = || ParseError::MalformedVoteRequest(line.to_string());
        let (account, amount) = body.and_then(|b| b.rsplit_once(' ')).ok_or_else(malformed)?;
        if account.is_empty() {
            return Err(malformed());
        }
        let amount = amount.parse::<Amount>().map_err(|_| malformed())?;

        Ok(Self::vote_request(account, amount))
    }

    /// The leading token of the message on the wire
    pub fn verb(&self) -> &'static str {
        match self {
            Self::VoteRequest(_) => VOTE_REQUEST,
            Self::GlobalCommit => GLOBAL_COMMIT,
            Self::GlobalAbort => GLOBAL_ABORT,
        }
    }
}

impl fmt::Display for CoordinatorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VoteRequest(request) => {
                write!(f, "{} {} {}", VOTE_REQUEST, request.account, request.amount)
            }
            other => f.write_str(other.verb()),
        }
    }
}

/// Errors from parsing protocol lines
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected message: {0}")]
    UnexpectedMessage(String),

    #[error("Malformed vote request: {0}")]
    MalformedVoteRequest(String),

    #[error("Unknown response: {0}")]
    UnknownResponse(String),
}
