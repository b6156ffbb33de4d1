//! Reconnect loop against a scripted connector.

mod common;

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{recording, test_config, Log, Server};
use slirc_bot::{ClientError, Connector, ReconnectPolicy, Reconnector};
use tokio::io::{duplex, DuplexStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Hands the server half of every successful connection to the test.
struct FakeConnector {
    servers: mpsc::UnboundedSender<DuplexStream>,
    failures: usize,
    attempts: Arc<Mutex<Vec<Instant>>>,
}

impl Connector for FakeConnector {
    type Stream = DuplexStream;

    async fn connect(&mut self) -> Result<DuplexStream, ClientError> {
        self.attempts.lock().unwrap().push(Instant::now());
        if self.failures > 0 {
            self.failures -= 1;
            return Err(ClientError::Connect {
                addr: "irc.test:6667".to_string(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }

        let (client, server) = duplex(4096);
        self.servers
            .send(server)
            .map_err(|_| ClientError::ConnectionClosed)?;
        Ok(client)
    }
}

struct Harness {
    servers: mpsc::UnboundedReceiver<DuplexStream>,
    attempts: Arc<Mutex<Vec<Instant>>>,
    task: JoinHandle<()>,
}

impl Harness {
    fn start(failures: usize, policy: ReconnectPolicy, log: &Log) -> Self {
        let (tx, servers) = mpsc::unbounded_channel();
        let attempts = Arc::new(Mutex::new(Vec::new()));
        let connector = FakeConnector {
            servers: tx,
            failures,
            attempts: Arc::clone(&attempts),
        };

        let mut config = test_config();
        config.reconnect = policy;
        let reconnector = Reconnector::new(connector, config, recording(log));
        let task = tokio::spawn(async move {
            match reconnector.run().await {}
        });

        Self {
            servers,
            attempts,
            task,
        }
    }

    async fn next_server(&mut self) -> Server {
        Server::new(self.servers.recv().await.expect("reconnector stopped"))
    }

    /// Gaps between consecutive connection attempts.
    fn gaps(&self) -> Vec<Duration> {
        let attempts = self.attempts.lock().unwrap();
        attempts.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[tokio::test(start_paused = true)]
async fn test_reconnects_after_peer_close() {
    let log = Log::default();
    let mut harness = Harness::start(0, ReconnectPolicy::default(), &log);

    let mut server = harness.next_server().await;
    server.expect_registration().await;
    server.welcome().await;
    drop(server);

    let mut server = harness.next_server().await;
    server.expect_registration().await;

    assert_eq!(harness.gaps(), vec![Duration::from_secs(10)]);
    assert_eq!(
        log.entries(),
        vec!["connect", "disconnect connection closed by peer"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_reconnects_after_closing_link() {
    let log = Log::default();
    let mut harness = Harness::start(0, ReconnectPolicy::default(), &log);

    let mut server = harness.next_server().await;
    server.expect_registration().await;
    server.welcome().await;
    server.send("ERROR :Closing Link: devbot.host (Killed)").await;

    let mut next = harness.next_server().await;
    next.expect_registration().await;
    drop(server);

    assert_eq!(
        log.entries(),
        vec!["connect", "disconnect server closed the link: devbot.host (Killed)"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_connect_failure_is_retried() {
    let log = Log::default();
    let mut harness = Harness::start(1, ReconnectPolicy::default(), &log);

    let mut server = harness.next_server().await;
    server.expect_registration().await;

    assert_eq!(harness.gaps(), vec![Duration::from_secs(10)]);
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert!(
        entries[0].starts_with("disconnect failed to connect to irc.test:6667"),
        "{entries:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_backoff_grows_and_resets_after_registration() {
    let log = Log::default();
    let policy = ReconnectPolicy::exponential(Duration::from_secs(1), Duration::from_secs(4), 2);
    let mut harness = Harness::start(4, policy, &log);

    let mut server = harness.next_server().await;
    server.expect_registration().await;
    server.welcome().await;
    drop(server);

    let mut server = harness.next_server().await;
    server.expect_registration().await;

    let secs: Vec<u64> = harness.gaps().iter().map(Duration::as_secs).collect();
    assert_eq!(secs, vec![1, 2, 4, 4, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_nick_in_use_reconnects_with_same_nick() {
    let log = Log::default();
    let mut harness = Harness::start(0, ReconnectPolicy::default(), &log);

    let mut server = harness.next_server().await;
    server.expect_registration().await;
    server
        .send(":irc.test 433 * DevBot :Nickname is already in use")
        .await;

    let mut next = harness.next_server().await;
    next.expect_registration().await;
    drop(server);

    assert_eq!(
        log.entries(),
        vec!["nick_in_use", "disconnect nickname in use: DevBot"]
    );
}
