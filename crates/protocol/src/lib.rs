//! Protocol definitions for coordinator-participant communication
//!
//! Every message is a single line of text. The coordinator sends
//! [`CoordinatorMessage`]s and each participant answers with a
//! [`ParticipantResponse`]; request and response strictly alternate on a
//! connection.

pub mod messages;
pub mod responses;

pub use messages::{CoordinatorMessage, ParseError, VoteRequest};
pub use responses::ParticipantResponse;
