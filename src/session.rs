//! One connection attempt: registration, the read loop and dispatch.
//!
//! A [`Session`] owns the framed socket for exactly one connection. It
//! registers, reads lines until something terminal happens, and then hands
//! the reason back as a [`ClientError`]. It never reconnects; that is the
//! job of [`Reconnector`](crate::reconnect::Reconnector).
//!
//! ```text
//! Disconnected -> Connecting -> Registering -> Registered -> Disconnected
//! ```

use std::convert::Infallible;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::event::{self, Event, MessageKind};
use crate::handlers::{Handlers, Outbox};
use crate::line::LineCodec;
use crate::response::Response;
use crate::transport::Connector;

/// Marker the server puts before the reason when it drops the link.
const CLOSING_LINK: &str = "ERROR :Closing Link:";

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No socket.
    #[default]
    Disconnected,
    /// Socket open, registration not yet sent.
    Connecting,
    /// `PASS`/`USER`/`NICK` sent, waiting for 001.
    Registering,
    /// 001 received.
    Registered,
}

/// A live connection to the server.
pub struct Session<'a, S> {
    framed: Framed<S, LineCodec>,
    config: &'a Config,
    handlers: &'a mut Handlers,
    outbox: Outbox,
    nickname: String,
    state: SessionState,
    registered: bool,
}

impl<'a, S> Session<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Open a stream with `connector` and wrap it in a session.
    pub async fn connect<C>(
        connector: &mut C,
        config: &'a Config,
        handlers: &'a mut Handlers,
    ) -> Result<Self>
    where
        C: Connector<Stream = S>,
    {
        info!(server = %config.connection.server_addr(), "connecting");
        let stream = connector.connect().await?;
        Ok(Self::new(stream, config, handlers))
    }

    /// Wrap an already connected stream.
    pub fn new(stream: S, config: &'a Config, handlers: &'a mut Handlers) -> Self {
        Self {
            framed: Framed::new(stream, LineCodec::new()),
            config,
            handlers,
            outbox: Outbox::new(),
            nickname: config.identity.nickname.clone(),
            state: SessionState::Connecting,
            registered: false,
        }
    }

    /// The nickname the server currently knows the bot by.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once 001 was received, even after the session ended.
    pub fn was_registered(&self) -> bool {
        self.registered
    }

    /// Register and process lines until the connection ends.
    ///
    /// Always returns the reason the session stopped.
    pub async fn run(&mut self) -> ClientError {
        let error = match self.drive().await {
            Ok(never) => match never {},
            Err(e) => e,
        };
        self.state = SessionState::Disconnected;
        info!(error = %error, nickname = %self.nickname, "session ended");
        error
    }

    async fn drive(&mut self) -> Result<Infallible> {
        self.register().await?;
        loop {
            let line = self.next_line().await?;
            self.handle_line(&line).await?;
        }
    }

    async fn next_line(&mut self) -> Result<String> {
        match self.framed.next().await {
            Some(line) => line,
            None => Err(ClientError::ConnectionClosed),
        }
    }

    async fn register(&mut self) -> Result<()> {
        let config = self.config;
        let identity = &config.identity;
        self.state = SessionState::Registering;
        info!(nickname = %self.nickname, "registering");

        if let Some(password) = &config.connection.password {
            self.send(Command::PASS(password.clone())).await?;
        }
        self.send(Command::USER(
            identity.username.clone(),
            identity.realname.clone(),
        ))
        .await?;
        self.send(Command::NICK(self.nickname.clone())).await
    }

    async fn handle_line(&mut self, line: &str) -> Result<()> {
        debug!("<< {}", line);

        if let Some(reason) = line.strip_prefix(CLOSING_LINK) {
            return Err(ClientError::ServerClosed(reason.trim().to_owned()));
        }

        match event::parse(line, &self.nickname) {
            Ok(Some(event)) => self.dispatch(event).await,
            Ok(None) => Ok(()),
            Err(e) => {
                warn!(error = %e, line, "dropping malformed line");
                Ok(())
            }
        }
    }

    async fn dispatch(&mut self, event: Event) -> Result<()> {
        let out = &mut self.outbox;
        match event {
            Event::Ping(token) => return self.send(Command::PONG(token)).await,
            Event::Numeric { code, params } => {
                self.handlers.numeric(out, code, &params);
                self.flush().await?;
                return self.on_numeric(code).await;
            }
            event if event.is_from(&self.nickname) => {
                if let Event::Nick { new_nick, .. } = event {
                    info!(old = %self.nickname, new = %new_nick, "nickname changed");
                    self.nickname = new_nick;
                }
                return Ok(());
            }
            Event::Invite { source, channel } => self.handlers.invite(out, &source.nick, &channel),
            Event::Join { source, channel } => self.handlers.join(out, &source.nick, &channel),
            Event::Part { source, channel } => self.handlers.part(out, &source.nick, &channel),
            Event::Quit { source } => self.handlers.quit(out, &source.nick),
            Event::Nick { source, new_nick } => self.handlers.nick(out, &source.nick, &new_nick),
            Event::Privmsg {
                source,
                target,
                text,
                kind,
            } => match kind {
                MessageKind::Ctcp => self.handlers.ctcp(out, &source.nick, &target, &text),
                MessageKind::Private => self.handlers.private(out, &source.nick, &text),
                MessageKind::Channel => self.handlers.message(out, &source.nick, &target, &text),
            },
            Event::Kick {
                source,
                channel,
                kicked,
            } => {
                self.handlers.kick(out, &source.nick, &channel, &kicked);
                self.flush().await?;
                return self.on_kick(&channel, &kicked).await;
            }
        }
        self.flush().await
    }

    async fn on_numeric(&mut self, code: u16) -> Result<()> {
        match Response::from_code(code) {
            Some(Response::RPL_WELCOME) if !self.registered => self.on_registered().await,
            Some(Response::ERR_NICKNAMEINUSE) => {
                warn!(nickname = %self.nickname, "nickname in use");
                self.handlers.nick_in_use(&mut self.outbox);
                self.flush().await?;
                if self.registered {
                    Ok(())
                } else {
                    Err(ClientError::NickInUse(self.nickname.clone()))
                }
            }
            _ => Ok(()),
        }
    }

    async fn on_registered(&mut self) -> Result<()> {
        let config = self.config;
        let identity = &config.identity;
        self.state = SessionState::Registered;
        self.registered = true;
        info!(nickname = %self.nickname, "registered");

        if let Some(password) = &identity.nickserv_password {
            for command in Command::identify(&identity.nickname, password) {
                self.send(command).await?;
            }
        }
        if let Some(oper) = &identity.oper {
            self.send(Command::OPER(oper.name.clone(), oper.password.clone()))
                .await?;
        }
        self.join_channel().await?;

        self.handlers.connect(&mut self.outbox);
        self.flush().await
    }

    async fn on_kick(&mut self, channel: &str, kicked: &str) -> Result<()> {
        let config = self.config;
        if kicked != self.nickname || channel != config.channel.name {
            return Ok(());
        }
        info!(channel, delay = ?config.rejoin_delay, "kicked, rejoining");
        tokio::time::sleep(config.rejoin_delay).await;
        self.join_channel().await
    }

    async fn join_channel(&mut self) -> Result<()> {
        let config = self.config;
        let channel = &config.channel;
        self.send(Command::join(&channel.name, channel.key.as_deref()))
            .await
    }

    async fn send(&mut self, command: Command) -> Result<()> {
        log_outgoing(&command);
        self.framed.send(command).await
    }

    /// Write everything a handler queued, in order.
    async fn flush(&mut self) -> Result<()> {
        if self.outbox.is_empty() {
            return Ok(());
        }
        let queued: Vec<Command> = self.outbox.drain().collect();
        for command in queued {
            log_outgoing(&command);
            self.framed.feed(command).await?;
        }
        self.framed.flush().await
    }
}

fn log_outgoing(command: &Command) {
    if command.is_sensitive() {
        debug!(">> {} <redacted>", command.name());
    } else {
        debug!(">> {}", command);
    }
}
