//! Outgoing IRC commands.
//!
//! [`Command`] covers every command the client sends. Its `Display`
//! implementation produces the wire form without the trailing CRLF; the
//! [`LineCodec`](crate::line::LineCodec) appends it.

use std::fmt;

use crate::ctcp;

/// Service that receives `RECOVER` and `IDENTIFY`.
pub const NICKSERV: &str = "NickServ";

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `USER username 0 * :realname`
    USER(String, String),
    /// `NICK nickname`
    NICK(String),
    /// `JOIN channel [key]`
    JOIN(String, Option<String>),
    /// `PART channel [message]`
    PART(String, Option<String>),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `NOTICE target :text`
    NOTICE(String, String),
    /// `MODE target modes`
    MODE(String, String),
    /// `TOPIC channel :text`
    TOPIC(String, String),
    /// `INVITE nickname channel`
    INVITE(String, String),
    /// `OPER name password`
    OPER(String, String),
    /// `QUIT [:message]`
    QUIT(Option<String>),
    /// `PONG token`
    PONG(String),
    /// A preformatted line, sent as is.
    Raw(String),
}

impl Command {
    /// `JOIN` for a channel with an optional key.
    pub fn join(channel: &str, key: Option<&str>) -> Self {
        Self::JOIN(channel.to_owned(), key.map(str::to_owned))
    }

    /// `PRIVMSG` to a channel or nickname.
    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::PRIVMSG(target.to_owned(), text.to_owned())
    }

    /// CTCP request: `PRIVMSG target :\x01data\x01`.
    pub fn ctcp(target: &str, data: &str) -> Self {
        Self::PRIVMSG(target.to_owned(), ctcp::wrap(data))
    }

    /// CTCP reply: `NOTICE target :\x01data\x01`.
    pub fn ctcp_reply(target: &str, data: &str) -> Self {
        Self::NOTICE(target.to_owned(), ctcp::wrap(data))
    }

    /// `/me` action: CTCP `ACTION text`.
    pub fn action(target: &str, text: &str) -> Self {
        Self::ctcp(target, &format!("ACTION {text}"))
    }

    /// NickServ `RECOVER` then `IDENTIFY` for `nickname`.
    pub fn identify(nickname: &str, password: &str) -> [Self; 2] {
        [
            Self::privmsg(NICKSERV, &format!("RECOVER {nickname} {password}")),
            Self::privmsg(NICKSERV, &format!("IDENTIFY {nickname} {password}")),
        ]
    }

    /// Command name, for logging.
    pub fn name(&self) -> &str {
        match self {
            Self::PASS(_) => "PASS",
            Self::USER(..) => "USER",
            Self::NICK(_) => "NICK",
            Self::JOIN(..) => "JOIN",
            Self::PART(..) => "PART",
            Self::PRIVMSG(..) => "PRIVMSG",
            Self::NOTICE(..) => "NOTICE",
            Self::MODE(..) => "MODE",
            Self::TOPIC(..) => "TOPIC",
            Self::INVITE(..) => "INVITE",
            Self::OPER(..) => "OPER",
            Self::QUIT(_) => "QUIT",
            Self::PONG(_) => "PONG",
            Self::Raw(line) => line.split(' ').next().unwrap_or(""),
        }
    }

    /// Whether the wire form carries a secret and must not be logged verbatim.
    pub fn is_sensitive(&self) -> bool {
        match self {
            Self::PASS(_) | Self::OPER(..) => true,
            Self::PRIVMSG(target, _) => target.eq_ignore_ascii_case(NICKSERV),
            Self::Raw(line) => raw_is_sensitive(line),
            _ => false,
        }
    }
}

/// Classify a preformatted line by its command and first parameter.
fn raw_is_sensitive(line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return false;
    };
    if ["PASS", "OPER", "AUTHENTICATE"]
        .iter()
        .any(|c| command.eq_ignore_ascii_case(c))
    {
        return true;
    }
    ["PRIVMSG", "NOTICE"]
        .iter()
        .any(|c| command.eq_ignore_ascii_case(c))
        && words
            .next()
            .is_some_and(|target| target.eq_ignore_ascii_case(NICKSERV))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PASS(p) => write!(f, "PASS {p}"),
            Self::USER(u, r) => write!(f, "USER {u} 0 * :{r}"),
            Self::NICK(n) => write!(f, "NICK {n}"),
            Self::JOIN(c, Some(k)) => write!(f, "JOIN {c} {k}"),
            Self::JOIN(c, None) => write!(f, "JOIN {c}"),
            Self::PART(c, Some(m)) => write!(f, "PART {c} {m}"),
            Self::PART(c, None) => write!(f, "PART {c}"),
            Self::PRIVMSG(t, m) => write!(f, "PRIVMSG {t} :{m}"),
            Self::NOTICE(t, m) => write!(f, "NOTICE {t} :{m}"),
            Self::MODE(t, m) => write!(f, "MODE {t} {m}"),
            Self::TOPIC(c, t) => write!(f, "TOPIC {c} :{t}"),
            Self::INVITE(n, c) => write!(f, "INVITE {n} {c}"),
            Self::OPER(n, p) => write!(f, "OPER {n} {p}"),
            Self::QUIT(Some(m)) => write!(f, "QUIT :{m}"),
            Self::QUIT(None) => f.write_str("QUIT"),
            Self::PONG(t) => write!(f, "PONG {t}"),
            Self::Raw(line) => f.write_str(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_commands() {
        assert_eq!(Command::PASS("pw".into()).to_string(), "PASS pw");
        assert_eq!(
            Command::USER("devbot".into(), "Python IRC Bot".into()).to_string(),
            "USER devbot 0 * :Python IRC Bot"
        );
        assert_eq!(Command::NICK("DevBot".into()).to_string(), "NICK DevBot");
    }

    #[test]
    fn test_optional_arguments() {
        assert_eq!(Command::join("#dev", None).to_string(), "JOIN #dev");
        assert_eq!(Command::join("#dev", Some("key")).to_string(), "JOIN #dev key");
        assert_eq!(Command::PART("#dev".into(), None).to_string(), "PART #dev");
        assert_eq!(
            Command::PART("#dev".into(), Some("bye".into())).to_string(),
            "PART #dev bye"
        );
        assert_eq!(Command::QUIT(None).to_string(), "QUIT");
        assert_eq!(Command::QUIT(Some("later".into())).to_string(), "QUIT :later");
    }

    #[test]
    fn test_channel_commands() {
        assert_eq!(
            Command::MODE("#dev".into(), "+o nick".into()).to_string(),
            "MODE #dev +o nick"
        );
        assert_eq!(
            Command::TOPIC("#dev".into(), "new topic".into()).to_string(),
            "TOPIC #dev :new topic"
        );
        assert_eq!(
            Command::INVITE("nick".into(), "#dev".into()).to_string(),
            "INVITE nick #dev"
        );
        assert_eq!(
            Command::NOTICE("nick".into(), "hi".into()).to_string(),
            "NOTICE nick :hi"
        );
    }

    #[test]
    fn test_ctcp_and_action() {
        assert_eq!(
            Command::action("#dev", "waves").to_string(),
            "PRIVMSG #dev :\x01ACTION waves\x01"
        );
        assert_eq!(
            Command::ctcp("nick", "VERSION").to_string(),
            "PRIVMSG nick :\x01VERSION\x01"
        );
        assert_eq!(
            Command::ctcp_reply("nick", "VERSION slirc-bot").to_string(),
            "NOTICE nick :\x01VERSION slirc-bot\x01"
        );
    }

    #[test]
    fn test_identify_sends_recover_first() {
        let [recover, identify] = Command::identify("DevBot", "secret");
        assert_eq!(recover.to_string(), "PRIVMSG NickServ :RECOVER DevBot secret");
        assert_eq!(identify.to_string(), "PRIVMSG NickServ :IDENTIFY DevBot secret");
        assert!(recover.is_sensitive());
        assert!(!Command::privmsg("#dev", "secret").is_sensitive());
    }

    #[test]
    fn test_raw_credentials_are_sensitive() {
        assert!(Command::Raw("PRIVMSG NickServ :IDENTIFY nick pw".into()).is_sensitive());
        assert!(Command::Raw("privmsg nickserv :GHOST nick pw".into()).is_sensitive());
        assert!(Command::Raw("PASS x".into()).is_sensitive());
        assert!(Command::Raw("OPER admin pw".into()).is_sensitive());
        assert!(!Command::Raw("PRIVMSG #dev :PASS x".into()).is_sensitive());
        assert!(!Command::Raw("WHOIS nick".into()).is_sensitive());
        assert!(!Command::Raw(String::new()).is_sensitive());
    }

    #[test]
    fn test_raw_name() {
        assert_eq!(Command::Raw("WHOIS nick".into()).name(), "WHOIS");
        assert_eq!(Command::Raw("WHOIS nick".into()).to_string(), "WHOIS nick");
    }
}
