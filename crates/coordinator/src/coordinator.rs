//! Core coordinator implementation

use crate::error::{CoordinatorError, Result};
use crate::intent::TransferIntent;
use crate::transaction::{GlobalDecision, TransactionOutcome, Vote};
use proven_common::Amount;
use proven_protocol::{CoordinatorMessage, ParticipantResponse};
use proven_transport::{LineTransport, Transport, TransportError};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Drives one transfer through both phases of the commit protocol
pub struct Coordinator {
    intent: TransferIntent,
}

impl Coordinator {
    pub fn new(intent: TransferIntent) -> Self {
        Self { intent }
    }

    /// Connect to both participants and run the transaction.
    ///
    /// A participant that cannot be reached fails the whole run before any
    /// vote request is sent.
    pub async fn run_transaction(&self) -> Result<TransactionOutcome> {
        let mut origin = connect(&self.intent.origin.host, self.intent.origin.port).await?;
        let mut destination =
            connect(&self.intent.destination.host, self.intent.destination.port).await?;

        self.run_with_transports(&mut origin, &mut destination).await
    }

    /// Run the transaction over already established sessions
    pub async fn run_with_transports<O, D>(
        &self,
        origin: &mut O,
        destination: &mut D,
    ) -> Result<TransactionOutcome>
    where
        O: Transport,
        D: Transport,
    {
        let intent = &self.intent;

        // Phase one. Both exchanges run together; the decision waits for both.
        let (origin_vote, destination_vote) = tokio::try_join!(
            request_vote(origin, &intent.origin.account, intent.origin_change()),
            request_vote(
                destination,
                &intent.destination.account,
                intent.destination_change()
            ),
        )?;

        let decision = GlobalDecision::from_votes(&[origin_vote, destination_vote]);
        info!(
            "Votes: origin {:?}, destination {:?}. Sending {}",
            origin_vote, destination_vote, decision
        );

        // Phase two. The decision is final from here on, failures are only logged.
        let (origin_ack, destination_ack) = tokio::join!(
            deliver_decision(origin, decision, origin_vote),
            deliver_decision(destination, decision, destination_vote),
        );

        let outcome = TransactionOutcome {
            decision,
            acknowledged: origin_ack && destination_ack,
        };

        if outcome.acknowledged {
            info!("{}", outcome.summary());
        } else {
            warn!("{}", outcome.summary());
        }

        Ok(outcome)
    }
}

async fn connect(host: &str, port: u16) -> Result<LineTransport<TcpStream>> {
    let transport = LineTransport::connect(host, port)
        .await
        .map_err(|source| CoordinatorError::Participant {
            participant: format!("{}:{}", host, port),
            source,
        })?;

    info!("Connected to participant {}:{}", host, port);
    Ok(transport)
}

async fn request_vote<T: Transport>(transport: &mut T, account: &str, amount: Amount) -> Result<Vote> {
    let request = CoordinatorMessage::vote_request(account, amount);
    let peer = transport.peer().to_string();
    let participant_error = |source: TransportError| CoordinatorError::Participant {
        participant: peer.clone(),
        source,
    };

    info!("Sending '{}' to {}", request, peer);
    transport
        .send(&request.to_string())
        .await
        .map_err(participant_error)?;
    let reply = transport.receive().await.map_err(participant_error)?;

    let vote = Vote::from_reply(&reply);
    info!("Got '{}' from {} for account {}", reply, peer, account);
    Ok(vote)
}

/// Send the decision and wait for its acknowledgement.
///
/// A participant that voted abort has already finished its session, so it
/// only gets a best-effort copy of the decision and counts as acknowledged.
async fn deliver_decision<T: Transport>(
    transport: &mut T,
    decision: GlobalDecision,
    vote: Vote,
) -> bool {
    let message = decision.message().to_string();

    info!("Sending '{}' to {}", message, transport.peer());
    if let Err(e) = transport.send(&message).await {
        if vote == Vote::Abort {
            debug!("{} already closed its session: {}", transport.peer(), e);
            return true;
        }
        warn!("Failed to send {} to {}: {}", message, transport.peer(), e);
        return false;
    }

    if vote == Vote::Abort {
        return true;
    }

    match transport.receive().await {
        Ok(reply) if matches!(ParticipantResponse::parse(&reply), Ok(ParticipantResponse::Ack)) => {
            info!("Got '{}' from {} for {}", reply, transport.peer(), message);
            true
        }
        Ok(reply) => {
            warn!("Expected ACK from {}, got '{}'", transport.peer(), reply);
            false
        }
        Err(e) => {
            warn!("No ACK from {}: {}", transport.peer(), e);
            false
        }
    }
}
