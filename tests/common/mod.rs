//! Shared fixtures: an in-memory IRC server and a recording handler set.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use slirc_bot::{Config, Handlers};
use tokio::io::DuplexStream;
use tokio_util::codec::{Framed, LinesCodec};

/// Generous enough to never fire before a reconnect or rejoin delay, even
/// with paused time auto-advancing.
const RECV_TIMEOUT: Duration = Duration::from_secs(600);

/// Server side of an in-memory connection.
pub struct Server {
    framed: Framed<DuplexStream, LinesCodec>,
}

impl Server {
    pub fn new(stream: DuplexStream) -> Self {
        Self {
            framed: Framed::new(stream, LinesCodec::new()),
        }
    }

    /// Send one line, CRLF terminated.
    pub async fn send(&mut self, line: &str) {
        self.framed
            .send(format!("{line}\r"))
            .await
            .expect("client hung up");
    }

    /// Next line from the client, without CRLF.
    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(RECV_TIMEOUT, self.framed.next())
            .await
            .expect("timed out waiting for the client")
            .expect("client closed the connection")
            .expect("bad line from client")
    }

    pub async fn expect(&mut self, line: &str) {
        assert_eq!(self.recv().await, line);
    }

    /// `USER` then `NICK`, as the default test identity sends them.
    pub async fn expect_registration(&mut self) {
        self.expect("USER devbot 0 * :DevBot Test").await;
        self.expect("NICK DevBot").await;
    }

    /// Send 001 and consume the channel join that follows.
    pub async fn welcome(&mut self) {
        self.send(":irc.test 001 DevBot :Welcome to the test network").await;
        self.expect("JOIN #dev").await;
    }

    /// Round-trip a PING so everything sent before it has been handled.
    pub async fn sync(&mut self) {
        self.send("PING :sync").await;
        self.expect("PONG sync").await;
    }
}

pub fn test_config() -> Config {
    let mut config = Config::new("irc.test", 6667, "DevBot", "#dev");
    config.identity.realname = "DevBot Test".to_string();
    config
}

/// Thread-safe record of handler calls.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Handlers that only record what they were called with.
pub fn recording(log: &Log) -> Handlers {
    let l = log.clone();
    let handlers = Handlers::new().on_connect(move |_| l.push("connect"));
    let l = log.clone();
    let handlers = handlers.on_ctcp(move |_, nick, chan, msg| l.push(format!("ctcp {nick} {chan} {msg:?}")));
    let l = log.clone();
    let handlers = handlers.on_invite(move |_, nick, chan| l.push(format!("invite {nick} {chan}")));
    let l = log.clone();
    let handlers = handlers.on_join(move |_, nick, chan| l.push(format!("join {nick} {chan}")));
    let l = log.clone();
    let handlers =
        handlers.on_kick(move |_, nick, chan, kicked| l.push(format!("kick {nick} {chan} {kicked}")));
    let l = log.clone();
    let handlers =
        handlers.on_message(move |_, nick, chan, msg| l.push(format!("message {nick} {chan} {msg}")));
    let l = log.clone();
    let handlers = handlers.on_nick(move |_, old, new| l.push(format!("nick {old} {new}")));
    let l = log.clone();
    let handlers = handlers.on_nick_in_use(move |_| l.push("nick_in_use"));
    let l = log.clone();
    let handlers = handlers.on_part(move |_, nick, chan| l.push(format!("part {nick} {chan}")));
    let l = log.clone();
    let handlers = handlers.on_private(move |_, nick, msg| l.push(format!("private {nick} {msg}")));
    let l = log.clone();
    let handlers = handlers.on_quit(move |_, nick| l.push(format!("quit {nick}")));
    let l = log.clone();
    handlers.on_disconnect(move |e| l.push(format!("disconnect {e}")))
}
