//! Participant state machine for one coordinator connection

use crate::error::{ParticipantError, Result};
use crate::state::{ParticipantState, PendingTransfer};
use proven_common::SessionId;
use proven_ledger::{HoldDecision, LedgerStore};
use proven_protocol::{CoordinatorMessage, ParseError, ParticipantResponse, VoteRequest};
use tracing::{info, warn};

/// What the session loop should do after a request was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStep {
    /// Reply to send back, if any
    pub reply: Option<ParticipantResponse>,
    /// False ends the connection once the reply is sent
    pub continue_session: bool,
}

impl SessionStep {
    fn reply(reply: ParticipantResponse) -> Self {
        Self {
            reply: Some(reply),
            continue_session: true,
        }
    }

    fn reply_and_end(reply: ParticipantResponse) -> Self {
        Self {
            reply: Some(reply),
            continue_session: false,
        }
    }

    fn end() -> Self {
        Self {
            reply: None,
            continue_session: false,
        }
    }
}

/// Protocol state for a single coordinator connection
pub struct ParticipantSession {
    id: SessionId,
    state: ParticipantState,
    store: LedgerStore,
}

impl ParticipantSession {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            id: SessionId::new(),
            state: ParticipantState::Init,
            store,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &ParticipantState {
        &self.state
    }

    /// Process one message from the coordinator.
    ///
    /// Errors are returned only when the ledger could not be updated; protocol
    /// problems are answered (or not) through the returned [`SessionStep`].
    pub fn on_request(&mut self, line: &str) -> Result<SessionStep> {
        match std::mem::take(&mut self.state) {
            ParticipantState::Init => Ok(self.on_init(line)),
            ParticipantState::Ready(pending) => self.on_ready(pending, line),
        }
    }

    /// The coordinator went away; drop anything still held
    pub fn on_disconnect(&mut self) {
        if let ParticipantState::Ready(pending) = std::mem::take(&mut self.state) {
            self.store.release(self.id);
            warn!(
                "Coordinator disconnected while READY, releasing hold of {} on account {}. State: INIT",
                pending.amount, pending.account
            );
        }
    }

    fn on_init(&mut self, line: &str) -> SessionStep {
        let request = match CoordinatorMessage::parse(line) {
            Ok(CoordinatorMessage::VoteRequest(request)) => request,
            Ok(other) => return self.protocol_violation(other.verb()),
            Err(ParseError::MalformedVoteRequest(_)) => {
                warn!("Got malformed {:?}, replying VOTE-ABORT. State: ABORT", line);
                info!("Releasing hold from account");
                return SessionStep::reply_and_end(ParticipantResponse::VoteAbort);
            }
            Err(ParseError::UnexpectedMessage(token) | ParseError::UnknownResponse(token)) => {
                return self.protocol_violation(&token);
            }
        };

        self.vote(request)
    }

    fn protocol_violation(&self, token: &str) -> SessionStep {
        warn!(
            "Got {} while INIT, protocol violation; ending session without a vote. State: ABORT",
            token
        );
        info!("Releasing hold from account");
        SessionStep::end()
    }

    fn vote(&mut self, request: VoteRequest) -> SessionStep {
        let VoteRequest { account, amount } = request;
        info!("Holding {} from account {}", -amount, account);

        match self.store.try_hold(self.id, &account, amount) {
            HoldDecision::Held { balance } => {
                info!(
                    "Got VOTE-REQUEST, replying VOTE-COMMIT (balance {}). State: READY",
                    balance
                );
                self.state = ParticipantState::Ready(PendingTransfer { account, amount });
                SessionStep::reply(ParticipantResponse::VoteCommit)
            }
            HoldDecision::UnknownAccount => {
                info!(
                    "Got VOTE-REQUEST for unknown account {}, replying VOTE-ABORT. State: ABORT",
                    account
                );
                info!("Releasing hold from account {}", account);
                SessionStep::reply_and_end(ParticipantResponse::VoteAbort)
            }
            HoldDecision::Overflow => {
                warn!(
                    "Got VOTE-REQUEST, applying {} to account {} would overflow its balance, replying VOTE-ABORT. State: ABORT",
                    amount, account
                );
                SessionStep::reply_and_end(ParticipantResponse::VoteAbort)
            }
            HoldDecision::InsufficientFunds { available } => {
                info!(
                    "Got VOTE-REQUEST, insufficient funds ({} available for {}), replying VOTE-ABORT. State: ABORT",
                    available, amount
                );
                info!("Releasing hold from account {}", account);
                SessionStep::reply_and_end(ParticipantResponse::VoteAbort)
            }
        }
    }

    fn on_ready(&mut self, pending: PendingTransfer, line: &str) -> Result<SessionStep> {
        match CoordinatorMessage::parse(line) {
            Ok(CoordinatorMessage::GlobalAbort) => {
                self.store.release(self.id);
                info!("Got GLOBAL-ABORT, replying ACK. State: ABORT");
                info!("Releasing hold from account {}", pending.account);
                Ok(SessionStep::reply_and_end(ParticipantResponse::Ack))
            }
            Ok(CoordinatorMessage::GlobalCommit) => {
                let applied = self.store.commit(self.id)?.ok_or_else(|| {
                    ParticipantError::HoldLost {
                        account: pending.account.clone(),
                    }
                })?;
                info!("Got GLOBAL-COMMIT, replying ACK. State: COMMIT");
                info!(
                    "Committing {} to account {}, balance now {}",
                    applied.amount, applied.account, applied.balance
                );
                Ok(SessionStep::reply_and_end(ParticipantResponse::Ack))
            }
            _ => {
                self.store.release(self.id);
                warn!("Got {:?} while READY, no decision taken. State: INIT", line);
                info!("Releasing hold from account {}", pending.account);
                Ok(SessionStep::end())
            }
        }
    }
}
