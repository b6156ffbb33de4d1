//! Line classification.

use crate::ctcp;
use crate::error::ParseError;
use crate::prefix::Prefix;
use crate::response::parse_numeric;

use super::tokens::{strip_colon, Tokens};
use super::{Event, MessageKind};

type Builder = fn(&Tokens<'_>, Prefix, &str) -> Event;

/// User-originated commands: name, minimum token count, builder.
///
/// Each builder may index up to `min - 1` without checking.
const SOURCED: &[(&str, usize, Builder)] = &[
    ("INVITE", 4, invite),
    ("JOIN", 3, join),
    ("KICK", 4, kick),
    ("PART", 3, part),
    ("PRIVMSG", 4, privmsg),
    ("QUIT", 2, quit),
    ("NICK", 3, nick),
];

/// Classify a line.
///
/// `own_nick` is the bot's current nickname; it decides whether a PRIVMSG is
/// private. Returns `Ok(None)` for lines the client does not act on (fewer
/// than two tokens, unhandled commands).
pub fn parse(line: &str, own_nick: &str) -> Result<Option<Event>, ParseError> {
    let tokens = Tokens::new(line);
    if tokens.len() < 2 {
        return Ok(None);
    }

    if &tokens[0] == "PING" {
        return Ok(Some(Event::Ping(strip_colon(&tokens[1]).to_owned())));
    }

    if let Some(code) = parse_numeric(&tokens[1]) {
        return Ok(Some(Event::Numeric {
            code,
            params: tokens.tail(2).iter().map(|t| (*t).to_owned()).collect(),
        }));
    }

    let Some(&(command, min, build)) = SOURCED.iter().find(|(name, ..)| *name == &tokens[1])
    else {
        return Ok(None);
    };
    if tokens.len() < min {
        return Err(ParseError::NotEnoughTokens {
            command,
            expected: min,
            got: tokens.len(),
        });
    }

    let source = Prefix::parse(&tokens[0])?;
    Ok(Some(build(&tokens, source, own_nick)))
}

fn invite(tokens: &Tokens<'_>, source: Prefix, _: &str) -> Event {
    Event::Invite {
        source,
        channel: strip_colon(&tokens[3]).to_owned(),
    }
}

fn join(tokens: &Tokens<'_>, source: Prefix, _: &str) -> Event {
    Event::Join {
        source,
        channel: strip_colon(&tokens[2]).to_owned(),
    }
}

fn kick(tokens: &Tokens<'_>, source: Prefix, _: &str) -> Event {
    Event::Kick {
        source,
        channel: tokens[2].to_owned(),
        kicked: tokens[3].to_owned(),
    }
}

fn part(tokens: &Tokens<'_>, source: Prefix, _: &str) -> Event {
    Event::Part {
        source,
        channel: tokens[2].to_owned(),
    }
}

fn privmsg(tokens: &Tokens<'_>, source: Prefix, own_nick: &str) -> Event {
    let target = tokens[2].to_owned();
    let text = privmsg_body(tokens);
    let kind = if ctcp::is_ctcp(text) {
        MessageKind::Ctcp
    } else if target == own_nick {
        MessageKind::Private
    } else {
        MessageKind::Channel
    };

    Event::Privmsg {
        source,
        target,
        text: text.to_owned(),
        kind,
    }
}

/// Everything after `<prefix> PRIVMSG <target> :`. Without the trailing
/// colon the raw remainder is taken as is.
fn privmsg_body<'a>(tokens: &Tokens<'a>) -> &'a str {
    let delimiter = format!("{} PRIVMSG {} :", &tokens[0], &tokens[2]);
    match tokens.line().split_once(delimiter.as_str()) {
        Some((_, body)) => body,
        None => tokens.rest(3).map(strip_colon).unwrap_or_default(),
    }
}

fn quit(_: &Tokens<'_>, source: Prefix, _: &str) -> Event {
    Event::Quit { source }
}

fn nick(tokens: &Tokens<'_>, source: Prefix, _: &str) -> Event {
    Event::Nick {
        source,
        new_nick: strip_colon(&tokens[2]).to_owned(),
    }
}
