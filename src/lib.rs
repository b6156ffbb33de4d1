//! # slirc-bot
//!
//! A small, always-connected IRC client for bots.
//!
//! ## Features
//!
//! - CRLF line codec that tolerates arbitrary chunking, bad UTF-8 and
//!   over-long lines
//! - Tokenizer-based parser for the commands a bot reacts to
//! - Registration, NickServ identification, OPER and channel join
//! - Automatic PONG, kick rejoin and nickname tracking
//! - Reconnect loop with fixed or bounded exponential backoff
//! - Plain TCP or TLS (rustls), optional client certificate, bind address
//!   and IPv4/IPv6 selection

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ```no_run
//! use slirc_bot::{reconnect, Config, Handlers};
//!
//! # async fn start() -> Result<(), slirc_bot::ClientError> {
//! let config = Config::new("irc.libera.chat", 6667, "DevBot", "#dev");
//!
//! let handlers = Handlers::new()
//!     .on_message(|out, _nick, chan, msg| {
//!         if msg == "!test" {
//!             out.privmsg(chan, "It works!");
//!         }
//!     })
//!     .on_private(|out, nick, msg| out.privmsg(nick, msg));
//!
//! // Runs forever; only returns on an unusable configuration.
//! match reconnect::run(config, handlers).await? {}
//! # }
//! ```
//!
//! ## Layers
//!
//! - [`line::LineCodec`] frames the byte stream.
//! - [`event::parse`] classifies each line into an [`Event`].
//! - [`Session`] registers and dispatches events to [`Handlers`] for one
//!   connection.
//! - [`Reconnector`] runs sessions back to back forever.

pub mod command;
pub mod config;
pub mod ctcp;
pub mod error;
pub mod event;
pub mod handlers;
pub mod line;
pub mod prefix;
pub mod reconnect;
pub mod response;
pub mod session;
pub mod transport;

pub use self::command::Command;
pub use self::config::{
    AddressFamily, ChannelTarget, Config, ConnectionConfig, Identity, OperCredentials,
    ReconnectPolicy, TlsConfig,
};
pub use self::ctcp::{Ctcp, CtcpKind};
pub use self::error::{ClientError, LineError, ParseError};
pub use self::event::{Event, MessageKind};
pub use self::handlers::{Handlers, Outbox};
pub use self::line::LineCodec;
pub use self::prefix::Prefix;
pub use self::reconnect::Reconnector;
pub use self::response::Response;
pub use self::session::{Session, SessionState};
pub use self::transport::{Connector, MaybeTlsStream, TcpConnector};
