//! IRC numeric replies the client reacts to or reports.
//!
//! Numerics outside this list still reach consumers as raw codes through
//! [`Event::Numeric`](crate::event::Event::Numeric).
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol
//! - Modern IRC documentation: <https://modern.ircdocs.horse/>

#![allow(non_camel_case_types)]

use std::fmt;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network; registration is complete
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server info
    RPL_MYINFO = 4,
    /// 005 - Server supported features
    RPL_ISUPPORT = 5,
    /// 381 - You are now an IRC operator
    RPL_YOUREOPER = 381,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 436 - Nickname collision
    ERR_NICKCOLLISION = 436,
    /// 464 - Password incorrect
    ERR_PASSWDMISMATCH = 464,
    /// 465 - You are banned from this server
    ERR_YOUREBANNEDCREEP = 465,
    /// 471 - Channel is full
    ERR_CHANNELISFULL = 471,
    /// 473 - Invite only channel
    ERR_INVITEONLYCHAN = 473,
    /// 474 - Banned from channel
    ERR_BANNEDFROMCHAN = 474,
    /// 475 - Bad channel key
    ERR_BADCHANNELKEY = 475,
    /// 491 - No O-lines for your host
    ERR_NOOPERHOST = 491,
}

impl Response {
    /// Look up a known numeric.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::RPL_WELCOME,
            2 => Self::RPL_YOURHOST,
            3 => Self::RPL_CREATED,
            4 => Self::RPL_MYINFO,
            5 => Self::RPL_ISUPPORT,
            381 => Self::RPL_YOUREOPER,
            432 => Self::ERR_ERRONEUSNICKNAME,
            433 => Self::ERR_NICKNAMEINUSE,
            436 => Self::ERR_NICKCOLLISION,
            464 => Self::ERR_PASSWDMISMATCH,
            465 => Self::ERR_YOUREBANNEDCREEP,
            471 => Self::ERR_CHANNELISFULL,
            473 => Self::ERR_INVITEONLYCHAN,
            474 => Self::ERR_BANNEDFROMCHAN,
            475 => Self::ERR_BADCHANNELKEY,
            491 => Self::ERR_NOOPERHOST,
            _ => return None,
        })
    }

    /// Numeric code.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Error replies are 400-599.
    #[inline]
    pub fn is_error(self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Parse a three-digit numeric command token.
pub fn parse_numeric(token: &str) -> Option<u16> {
    if token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Response::from_code(1), Some(Response::RPL_WELCOME));
        assert_eq!(Response::from_code(433), Some(Response::ERR_NICKNAMEINUSE));
        assert_eq!(Response::from_code(999), None);
        assert_eq!(Response::RPL_WELCOME.to_string(), "001");
        assert!(Response::ERR_BADCHANNELKEY.is_error());
        assert!(!Response::RPL_ISUPPORT.is_error());
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("001"), Some(1));
        assert_eq!(parse_numeric("433"), Some(433));
        assert_eq!(parse_numeric("PRIVMSG"), None);
        assert_eq!(parse_numeric("01"), None);
        assert_eq!(parse_numeric("+12"), None);
    }
}
