//! Consumer event callbacks.
//!
//! [`Handlers`] is a set of optional closures, one per event. Unset
//! callbacks do nothing. Callbacks that want to talk back push commands into
//! the [`Outbox`] they are given; the session writes them as soon as the
//! callback returns, before reading the next line.
//!
//! # Example
//!
//! ```
//! use slirc_bot::Handlers;
//!
//! let handlers = Handlers::new()
//!     .on_message(|out, _nick, chan, msg| {
//!         if msg == "!test" {
//!             out.privmsg(chan, "It works!");
//!         }
//!     })
//!     .on_nick_in_use(|_| eprintln!("nickname taken"));
//! # drop(handlers);
//! ```

use std::fmt;

use crate::command::Command;
use crate::error::ClientError;

/// Commands queued by a callback.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: Vec<Command>,
}

impl Outbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue any command.
    pub fn send(&mut self, command: Command) {
        self.queue.push(command);
    }

    /// Queue a raw, preformatted line.
    pub fn raw(&mut self, line: &str) {
        self.send(Command::Raw(line.to_owned()));
    }

    /// `PRIVMSG target :text`
    pub fn privmsg(&mut self, target: &str, text: &str) {
        self.send(Command::privmsg(target, text));
    }

    /// `NOTICE target :text`
    pub fn notice(&mut self, target: &str, text: &str) {
        self.send(Command::NOTICE(target.to_owned(), text.to_owned()));
    }

    /// CTCP `ACTION` to a channel or user.
    pub fn action(&mut self, target: &str, text: &str) {
        self.send(Command::action(target, text));
    }

    /// CTCP request wrapped in `\x01`.
    pub fn ctcp(&mut self, target: &str, data: &str) {
        self.send(Command::ctcp(target, data));
    }

    /// CTCP reply (NOTICE) wrapped in `\x01`.
    pub fn ctcp_reply(&mut self, target: &str, data: &str) {
        self.send(Command::ctcp_reply(target, data));
    }

    /// `JOIN channel [key]`
    pub fn join(&mut self, channel: &str, key: Option<&str>) {
        self.send(Command::join(channel, key));
    }

    /// `PART channel [message]`
    pub fn part(&mut self, channel: &str, message: Option<&str>) {
        self.send(Command::PART(channel.to_owned(), message.map(str::to_owned)));
    }

    /// `MODE target modes`
    pub fn mode(&mut self, target: &str, modes: &str) {
        self.send(Command::MODE(target.to_owned(), modes.to_owned()));
    }

    /// `TOPIC channel :text`
    pub fn topic(&mut self, channel: &str, text: &str) {
        self.send(Command::TOPIC(channel.to_owned(), text.to_owned()));
    }

    /// `INVITE nickname channel`
    pub fn invite(&mut self, nickname: &str, channel: &str) {
        self.send(Command::INVITE(nickname.to_owned(), channel.to_owned()));
    }

    /// `NICK nickname`
    pub fn nick(&mut self, nickname: &str) {
        self.send(Command::NICK(nickname.to_owned()));
    }

    /// `OPER name password`
    pub fn oper(&mut self, name: &str, password: &str) {
        self.send(Command::OPER(name.to_owned(), password.to_owned()));
    }

    /// NickServ `RECOVER` followed by `IDENTIFY`.
    pub fn identify(&mut self, nickname: &str, password: &str) {
        self.queue.extend(Command::identify(nickname, password));
    }

    /// `QUIT [:message]`
    pub fn quit(&mut self, message: Option<&str>) {
        self.send(Command::QUIT(message.map(str::to_owned)));
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued command, in order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.queue.drain(..)
    }
}

type Hook0 = Box<dyn FnMut(&mut Outbox) + Send>;
type Hook1 = Box<dyn FnMut(&mut Outbox, &str) + Send>;
type Hook2 = Box<dyn FnMut(&mut Outbox, &str, &str) + Send>;
type Hook3 = Box<dyn FnMut(&mut Outbox, &str, &str, &str) + Send>;
type NumericHook = Box<dyn FnMut(&mut Outbox, u16, &[String]) + Send>;
type DisconnectHook = Box<dyn FnMut(&ClientError) + Send>;

/// Event callbacks supplied by the consumer.
///
/// Built with the `on_*` methods; each replaces any earlier callback for the
/// same event.
#[derive(Default)]
pub struct Handlers {
    connect: Option<Hook0>,
    ctcp: Option<Hook3>,
    invite: Option<Hook2>,
    join: Option<Hook2>,
    kick: Option<Hook3>,
    message: Option<Hook3>,
    nick: Option<Hook2>,
    nick_in_use: Option<Hook0>,
    numeric: Option<NumericHook>,
    part: Option<Hook2>,
    private: Option<Hook2>,
    quit: Option<Hook1>,
    disconnect: Option<DisconnectHook>,
}

impl Handlers {
    /// Handlers that do nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration finished and the channel join was sent.
    pub fn on_connect(mut self, f: impl FnMut(&mut Outbox) + Send + 'static) -> Self {
        self.connect = Some(Box::new(f));
        self
    }

    /// CTCP request: `(nick, target, raw body)`.
    pub fn on_ctcp(mut self, f: impl FnMut(&mut Outbox, &str, &str, &str) + Send + 'static) -> Self {
        self.ctcp = Some(Box::new(f));
        self
    }

    /// Invitation: `(nick, channel)`.
    pub fn on_invite(mut self, f: impl FnMut(&mut Outbox, &str, &str) + Send + 'static) -> Self {
        self.invite = Some(Box::new(f));
        self
    }

    /// Someone joined: `(nick, channel)`.
    pub fn on_join(mut self, f: impl FnMut(&mut Outbox, &str, &str) + Send + 'static) -> Self {
        self.join = Some(Box::new(f));
        self
    }

    /// Someone was kicked: `(kicker, channel, kicked)`.
    pub fn on_kick(mut self, f: impl FnMut(&mut Outbox, &str, &str, &str) + Send + 'static) -> Self {
        self.kick = Some(Box::new(f));
        self
    }

    /// Channel message: `(nick, channel, text)`.
    pub fn on_message(
        mut self,
        f: impl FnMut(&mut Outbox, &str, &str, &str) + Send + 'static,
    ) -> Self {
        self.message = Some(Box::new(f));
        self
    }

    /// Someone changed nickname: `(old, new)`.
    pub fn on_nick(mut self, f: impl FnMut(&mut Outbox, &str, &str) + Send + 'static) -> Self {
        self.nick = Some(Box::new(f));
        self
    }

    /// The server rejected the nickname (433).
    pub fn on_nick_in_use(mut self, f: impl FnMut(&mut Outbox) + Send + 'static) -> Self {
        self.nick_in_use = Some(Box::new(f));
        self
    }

    /// Any numeric reply: `(code, params)`.
    pub fn on_numeric(mut self, f: impl FnMut(&mut Outbox, u16, &[String]) + Send + 'static) -> Self {
        self.numeric = Some(Box::new(f));
        self
    }

    /// Someone left: `(nick, channel)`.
    pub fn on_part(mut self, f: impl FnMut(&mut Outbox, &str, &str) + Send + 'static) -> Self {
        self.part = Some(Box::new(f));
        self
    }

    /// Private message to the bot: `(nick, text)`.
    pub fn on_private(mut self, f: impl FnMut(&mut Outbox, &str, &str) + Send + 'static) -> Self {
        self.private = Some(Box::new(f));
        self
    }

    /// Someone quit: `(nick)`.
    pub fn on_quit(mut self, f: impl FnMut(&mut Outbox, &str) + Send + 'static) -> Self {
        self.quit = Some(Box::new(f));
        self
    }

    /// The session ended; called once per attempt, before the reconnect delay.
    pub fn on_disconnect(mut self, f: impl FnMut(&ClientError) + Send + 'static) -> Self {
        self.disconnect = Some(Box::new(f));
        self
    }

    pub(crate) fn connect(&mut self, out: &mut Outbox) {
        if let Some(f) = &mut self.connect {
            f(out);
        }
    }

    pub(crate) fn ctcp(&mut self, out: &mut Outbox, nick: &str, target: &str, body: &str) {
        if let Some(f) = &mut self.ctcp {
            f(out, nick, target, body);
        }
    }

    pub(crate) fn invite(&mut self, out: &mut Outbox, nick: &str, channel: &str) {
        if let Some(f) = &mut self.invite {
            f(out, nick, channel);
        }
    }

    pub(crate) fn join(&mut self, out: &mut Outbox, nick: &str, channel: &str) {
        if let Some(f) = &mut self.join {
            f(out, nick, channel);
        }
    }

    pub(crate) fn kick(&mut self, out: &mut Outbox, nick: &str, channel: &str, kicked: &str) {
        if let Some(f) = &mut self.kick {
            f(out, nick, channel, kicked);
        }
    }

    pub(crate) fn message(&mut self, out: &mut Outbox, nick: &str, channel: &str, text: &str) {
        if let Some(f) = &mut self.message {
            f(out, nick, channel, text);
        }
    }

    pub(crate) fn nick(&mut self, out: &mut Outbox, old: &str, new: &str) {
        if let Some(f) = &mut self.nick {
            f(out, old, new);
        }
    }

    pub(crate) fn nick_in_use(&mut self, out: &mut Outbox) {
        if let Some(f) = &mut self.nick_in_use {
            f(out);
        }
    }

    pub(crate) fn numeric(&mut self, out: &mut Outbox, code: u16, params: &[String]) {
        if let Some(f) = &mut self.numeric {
            f(out, code, params);
        }
    }

    pub(crate) fn part(&mut self, out: &mut Outbox, nick: &str, channel: &str) {
        if let Some(f) = &mut self.part {
            f(out, nick, channel);
        }
    }

    pub(crate) fn private(&mut self, out: &mut Outbox, nick: &str, text: &str) {
        if let Some(f) = &mut self.private {
            f(out, nick, text);
        }
    }

    pub(crate) fn quit(&mut self, out: &mut Outbox, nick: &str) {
        if let Some(f) = &mut self.quit {
            f(out, nick);
        }
    }

    pub(crate) fn disconnect(&mut self, error: &ClientError) {
        if let Some(f) = &mut self.disconnect {
            f(error);
        }
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<&str> = [
            ("connect", self.connect.is_some()),
            ("ctcp", self.ctcp.is_some()),
            ("invite", self.invite.is_some()),
            ("join", self.join.is_some()),
            ("kick", self.kick.is_some()),
            ("message", self.message.is_some()),
            ("nick", self.nick.is_some()),
            ("nick_in_use", self.nick_in_use.is_some()),
            ("numeric", self.numeric.is_some()),
            ("part", self.part.is_some()),
            ("private", self.private.is_some()),
            ("quit", self.quit.is_some()),
            ("disconnect", self.disconnect.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect();
        f.debug_struct("Handlers").field("set", &set).finish()
    }
}
