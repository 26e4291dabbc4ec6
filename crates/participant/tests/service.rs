//! End-to-end tests for the participant service over loopback TCP

use proven_ledger::{Amount, Ledger, LedgerStore};
use proven_participant::{ParticipantConfig, ParticipantServer};
use proven_transport::{LineTransport, Transport, TransportError};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

struct Service {
    _dir: tempfile::TempDir,
    account_file: PathBuf,
    port: u16,
    store: LedgerStore,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<proven_participant::Result<()>>,
}

impl Service {
    async fn start(records: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let account_file = dir.path().join("accounts.txt");
        std::fs::write(&account_file, records).unwrap();

        let config = ParticipantConfig::new(0, &account_file, dir.path().join("participant.log"))
            .with_host("127.0.0.1");
        let store = LedgerStore::open(&config.account_file).unwrap();
        let server = ParticipantServer::bind(&config, store.clone()).await.unwrap();
        let port = server.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(server.serve_with_shutdown(async {
            let _ = shutdown_rx.await;
        }));

        Self {
            _dir: dir,
            account_file,
            port,
            store,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    async fn connect(&self) -> LineTransport<TcpStream> {
        LineTransport::connect("127.0.0.1", self.port).await.unwrap()
    }

    fn ledger(&self) -> Ledger {
        Ledger::load(&self.account_file).unwrap()
    }

    fn balance(&self, account: &str) -> Amount {
        self.ledger().find(account).unwrap().balance()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

async fn exchange(session: &mut LineTransport<TcpStream>, line: &str) -> String {
    session.send(line).await.unwrap();
    timeout(Duration::from_secs(5), session.receive())
        .await
        .expect("reply timed out")
        .unwrap()
}

async fn expect_closed(session: &mut LineTransport<TcpStream>) {
    let result = timeout(Duration::from_secs(5), session.receive())
        .await
        .expect("close timed out");
    assert!(
        matches!(result, Err(TransportError::Closed) | Err(TransportError::Io(_))),
        "expected closed connection, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_commit_applies_and_persists() {
    let service = Service::start("100 alice\n50 bob\n").await;
    let mut session = service.connect().await;

    assert_eq!(exchange(&mut session, "VOTE-REQUEST alice -30").await, "VOTE-COMMIT");
    assert_eq!(exchange(&mut session, "GLOBAL-COMMIT").await, "ACK");
    expect_closed(&mut session).await;

    assert_eq!(service.balance("alice"), Amount::from(70));
    assert_eq!(service.balance("bob"), Amount::from(50));
    service.stop().await;
}

#[tokio::test]
async fn test_abort_after_commit_vote_changes_nothing() {
    let service = Service::start("100 alice\n").await;
    let mut session = service.connect().await;

    assert_eq!(exchange(&mut session, "VOTE-REQUEST alice 30").await, "VOTE-COMMIT");
    assert_eq!(exchange(&mut session, "GLOBAL-ABORT").await, "ACK");
    expect_closed(&mut session).await;

    assert_eq!(service.ledger().render(), "100 alice\n");
    assert_eq!(service.store.outstanding_holds(), 0);
    service.stop().await;
}

#[tokio::test]
async fn test_insufficient_funds_votes_abort_and_hangs_up() {
    let service = Service::start("10 alice\n").await;
    let mut session = service.connect().await;

    assert_eq!(exchange(&mut session, "VOTE-REQUEST alice -30").await, "VOTE-ABORT");
    expect_closed(&mut session).await;

    assert_eq!(service.balance("alice"), Amount::from(10));
    service.stop().await;
}

#[tokio::test]
async fn test_protocol_violation_keeps_service_running() {
    let service = Service::start("100 alice\n").await;

    let mut rogue = service.connect().await;
    rogue.send("HELLO alice -30").await.unwrap();
    expect_closed(&mut rogue).await;

    // The listener still serves the next coordinator
    let mut session = service.connect().await;
    assert_eq!(exchange(&mut session, "VOTE-REQUEST alice -100").await, "VOTE-COMMIT");
    assert_eq!(exchange(&mut session, "GLOBAL-COMMIT").await, "ACK");

    assert_eq!(service.balance("alice"), Amount::zero());
    service.stop().await;
}

#[tokio::test]
async fn test_concurrent_sessions_share_holds() {
    let service = Service::start("100 alice\n").await;

    let mut first = service.connect().await;
    let mut second = service.connect().await;

    assert_eq!(exchange(&mut first, "VOTE-REQUEST alice -70").await, "VOTE-COMMIT");
    assert_eq!(exchange(&mut second, "VOTE-REQUEST alice -70").await, "VOTE-ABORT");

    assert_eq!(exchange(&mut first, "GLOBAL-COMMIT").await, "ACK");
    assert_eq!(service.balance("alice"), Amount::from(30));
    service.stop().await;
}

#[tokio::test]
async fn test_hangup_while_ready_releases_hold() {
    let service = Service::start("100 alice\n").await;

    let mut session = service.connect().await;
    assert_eq!(exchange(&mut session, "VOTE-REQUEST alice -100").await, "VOTE-COMMIT");
    drop(session);

    // Wait for the session task to observe the hangup
    timeout(Duration::from_secs(5), async {
        while service.store.outstanding_holds() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("hold was never released");

    assert_eq!(service.balance("alice"), Amount::from(100));
    service.stop().await;
}
