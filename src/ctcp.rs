//! CTCP (Client-to-Client Protocol) helpers.
//!
//! CTCP messages travel inside PRIVMSG and NOTICE bodies, wrapped in the
//! `\x01` delimiter.
//!
//! # Example
//!
//! ```
//! use slirc_bot::ctcp::{Ctcp, CtcpKind};
//!
//! let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
//! assert_eq!(ctcp.kind, CtcpKind::Action);
//! assert_eq!(ctcp.params, Some("waves hello"));
//! ```

use std::fmt;

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// Returns true if a message body is a CTCP request or reply.
#[inline]
pub fn is_ctcp(body: &str) -> bool {
    body.starts_with(CTCP_DELIM)
}

/// Wrap `data` in CTCP delimiters.
pub fn wrap(data: &str) -> String {
    format!("{CTCP_DELIM}{data}{CTCP_DELIM}")
}

/// Known CTCP command types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CtcpKind {
    /// ACTION (`/me`).
    Action,
    /// VERSION request.
    Version,
    /// PING round-trip probe.
    Ping,
    /// TIME request.
    Time,
    /// CLIENTINFO request.
    Clientinfo,
    /// Anything else.
    Unknown(String),
}

impl CtcpKind {
    /// Parse a CTCP command name.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "ACTION" => Self::Action,
            "VERSION" => Self::Version,
            "PING" => Self::Ping,
            "TIME" => Self::Time,
            "CLIENTINFO" => Self::Clientinfo,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    /// Canonical uppercase name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Action => "ACTION",
            Self::Version => "VERSION",
            Self::Ping => "PING",
            Self::Time => "TIME",
            Self::Clientinfo => "CLIENTINFO",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for CtcpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed CTCP message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The CTCP command.
    pub kind: CtcpKind,
    /// Text after the command, if any.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Parse a PRIVMSG/NOTICE body. Returns `None` if it is not CTCP.
    ///
    /// The closing delimiter is optional, as many clients omit it.
    pub fn parse(body: &'a str) -> Option<Self> {
        let inner = body.strip_prefix(CTCP_DELIM)?;
        let inner = inner.strip_suffix(CTCP_DELIM).unwrap_or(inner);
        if inner.is_empty() {
            return None;
        }

        let (name, params) = match inner.split_once(' ') {
            Some((name, rest)) => (name, Some(rest).filter(|p| !p.is_empty())),
            None => (inner, None),
        };
        Some(Self {
            kind: CtcpKind::parse(name),
            params,
        })
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params {
            Some(params) => write!(f, "{CTCP_DELIM}{} {params}{CTCP_DELIM}", self.kind),
            None => write!(f, "{CTCP_DELIM}{}{CTCP_DELIM}", self.kind),
        }
    }
}
