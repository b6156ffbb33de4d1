//! Parsed protocol events.
//!
//! [`parse`] classifies one decoded line into an [`Event`]. The parser is
//! pure: it never touches the socket, so the session decides what to send
//! and which handler to call.
//!
//! # Example
//!
//! ```
//! use slirc_bot::event::{parse, Event, MessageKind};
//!
//! let event = parse(":nick!i@h PRIVMSG DevBot :hello", "DevBot")
//!     .unwrap()
//!     .unwrap();
//! match event {
//!     Event::Privmsg { source, text, kind, .. } => {
//!         assert_eq!(source.nick, "nick");
//!         assert_eq!(text, "hello");
//!         assert_eq!(kind, MessageKind::Private);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

mod parse;
mod tokens;

pub use self::parse::parse;
pub use self::tokens::{strip_colon, Tokens};

use crate::prefix::Prefix;
use crate::response::Response;

/// How a PRIVMSG body should be routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// Sent to a channel.
    Channel,
    /// Sent directly to the bot.
    Private,
    /// A CTCP request (body starts with `\x01`), to a channel or the bot.
    Ctcp,
}

/// One parsed server line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// `PING :token`; answered by the session, never dispatched.
    Ping(String),
    /// Numeric reply with its raw parameter tokens.
    Numeric {
        /// Three-digit code.
        code: u16,
        /// Tokens after the code.
        params: Vec<String>,
    },
    /// `:src INVITE nick :#channel`
    Invite {
        /// Who sent the invite.
        source: Prefix,
        /// Channel the bot was invited to.
        channel: String,
    },
    /// `:src JOIN :#channel`
    Join {
        /// Who joined.
        source: Prefix,
        /// Channel joined.
        channel: String,
    },
    /// `:src KICK #channel kicked :reason`
    Kick {
        /// Who kicked.
        source: Prefix,
        /// Channel kicked from.
        channel: String,
        /// Nickname that was kicked.
        kicked: String,
    },
    /// `:src PART #channel`
    Part {
        /// Who left.
        source: Prefix,
        /// Channel left.
        channel: String,
    },
    /// `:src PRIVMSG target :text`
    Privmsg {
        /// Sender.
        source: Prefix,
        /// Channel or nickname the message was sent to.
        target: String,
        /// Message body, embedded colons preserved.
        text: String,
        /// Routing classification.
        kind: MessageKind,
    },
    /// `:src QUIT :reason`
    Quit {
        /// Who quit.
        source: Prefix,
    },
    /// `:src NICK :newnick`
    Nick {
        /// The old identity.
        source: Prefix,
        /// The nickname it changed to.
        new_nick: String,
    },
}

impl Event {
    /// The user that originated the event, if it has one.
    pub fn source(&self) -> Option<&Prefix> {
        match self {
            Self::Ping(_) | Self::Numeric { .. } => None,
            Self::Invite { source, .. }
            | Self::Join { source, .. }
            | Self::Kick { source, .. }
            | Self::Part { source, .. }
            | Self::Privmsg { source, .. }
            | Self::Quit { source }
            | Self::Nick { source, .. } => Some(source),
        }
    }

    /// True if the event was originated by `nickname`.
    pub fn is_from(&self, nickname: &str) -> bool {
        self.source().is_some_and(|s| s.nick == nickname)
    }

    /// The known numeric, for [`Event::Numeric`].
    pub fn response(&self) -> Option<Response> {
        match self {
            Self::Numeric { code, .. } => Response::from_code(*code),
            _ => None,
        }
    }
}
