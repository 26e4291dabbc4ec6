//! Accept loop and per-connection session driver

use crate::config::ParticipantConfig;
use crate::error::{ParticipantError, Result};
use crate::session::ParticipantSession;
use proven_ledger::LedgerStore;
use proven_transport::{LineTransport, Transport, TransportError};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, info_span, warn};

/// Transaction service accepting coordinator connections
pub struct ParticipantServer {
    listener: TcpListener,
    store: LedgerStore,
}

impl ParticipantServer {
    /// Bind the listening socket
    pub async fn bind(config: &ParticipantConfig, store: LedgerStore) -> Result<Self> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ParticipantError::Bind { addr, source })?;

        Ok(Self { listener, store })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves or a fatal ledger error occurs.
    ///
    /// Each connection runs in its own task with its own session state.
    pub async fn serve_with_shutdown(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let (fatal_tx, mut fatal_rx) = mpsc::channel::<ParticipantError>(1);
        let port = self.local_addr()?.port();
        info!("Transaction service on port {} (Ctrl-C to stop)", port);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Transaction service on port {} stopping", port);
                    return Ok(());
                }
                Some(err) = fatal_rx.recv() => {
                    error!("Stopping transaction service: {}", err);
                    return Err(err);
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            warn!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };

                    let session = ParticipantSession::new(self.store.clone());
                    let span = info_span!("session", id = %session.id(), peer = %peer);
                    let fatal_tx = fatal_tx.clone();

                    tokio::spawn(
                        async move {
                            let transport = LineTransport::new(stream, peer.to_string());
                            if let Err(err) = run_session(transport, session).await {
                                if err.is_fatal() {
                                    let _ = fatal_tx.send(err).await;
                                } else {
                                    warn!("Session ended with error: {}", err);
                                }
                            }
                        }
                        .instrument(span),
                    );
                }
            }
        }
    }
}

/// Drive one session: receive a line, hand it to the state machine, send the
/// reply, until the state machine ends the session or the peer goes away.
pub async fn run_session<T: Transport>(
    mut transport: T,
    mut session: ParticipantSession,
) -> Result<()> {
    info!(
        "Accepting coordinator connection from {}. State: {}",
        transport.peer(),
        session.state()
    );

    loop {
        let line = match transport.receive().await {
            Ok(line) => line,
            Err(TransportError::Closed) => {
                session.on_disconnect();
                info!("Coordinator {} closed the connection", transport.peer());
                return Ok(());
            }
            Err(err) => {
                session.on_disconnect();
                return Err(err.into());
            }
        };
        info!("Received '{}' from {}", line, transport.peer());

        let step = session.on_request(&line)?;

        if let Some(reply) = step.reply {
            if let Err(err) = transport.send(reply.as_str()).await {
                session.on_disconnect();
                return Err(err.into());
            }
            info!("Sent '{}' to {}", reply, transport.peer());
        }

        if !step.continue_session {
            info!("Closing connection to {}", transport.peer());
            return Ok(());
        }
    }
}
