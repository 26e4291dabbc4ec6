//! Typed responses for participant-to-coordinator communication

use crate::messages::ParseError;
use std::fmt;

pub const VOTE_COMMIT: &str = "VOTE-COMMIT";
pub const VOTE_ABORT: &str = "VOTE-ABORT";
pub const ACK: &str = "ACK";

/// Replies a participant can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantResponse {
    /// Account exists and the change is affordable; funds are held
    VoteCommit,
    /// Account missing or insufficient funds
    VoteAbort,
    /// Decision processed
    Ack,
}

impl ParticipantResponse {
    /// Parse from a received line
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        match line {
            VOTE_COMMIT => Ok(Self::VoteCommit),
            VOTE_ABORT => Ok(Self::VoteAbort),
            ACK => Ok(Self::Ack),
            other => Err(ParseError::UnknownResponse(other.to_string())),
        }
    }

    /// Convert to the wire literal
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VoteCommit => VOTE_COMMIT,
            Self::VoteAbort => VOTE_ABORT,
            Self::Ack => ACK,
        }
    }
}

impl fmt::Display for ParticipantResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
