//! Message source (prefix) parsing.

use std::fmt;

use crate::error::ParseError;

/// The source of a user-originated message: `nick!ident@host`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Prefix {
    /// Nickname.
    pub nick: String,
    /// Username / ident, if present.
    pub ident: Option<String>,
    /// Hostname, if present.
    pub host: Option<String>,
}

impl Prefix {
    /// Parse the first token of a line, with or without its leading `:`.
    ///
    /// ```
    /// use slirc_bot::Prefix;
    ///
    /// let prefix = Prefix::parse(":nick!ident@host.example").unwrap();
    /// assert_eq!(prefix.nick, "nick");
    /// assert_eq!(prefix.ident.as_deref(), Some("ident"));
    /// assert_eq!(prefix.host.as_deref(), Some("host.example"));
    /// ```
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        let source = token.strip_prefix(':').unwrap_or(token);
        let (nick, user_host) = match source.split_once('!') {
            Some((nick, rest)) => (nick, Some(rest)),
            None => (source, None),
        };
        // `nick@host` without an ident is legal too.
        let (nick, ident, host) = match user_host {
            Some(rest) => match rest.split_once('@') {
                Some((ident, host)) => (nick, Some(ident), Some(host)),
                None => (nick, Some(rest), None),
            },
            None => match nick.split_once('@') {
                Some((nick, host)) => (nick, None, Some(host)),
                None => (nick, None, None),
            },
        };

        if nick.is_empty() {
            return Err(ParseError::InvalidPrefix(token.to_owned()));
        }

        Ok(Self {
            nick: nick.to_owned(),
            ident: ident.map(str::to_owned),
            host: host.map(str::to_owned),
        })
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nick)?;
        if let Some(ident) = &self.ident {
            write!(f, "!{ident}")?;
        }
        if let Some(host) = &self.host {
            write!(f, "@{host}")?;
        }
        Ok(())
    }
}
