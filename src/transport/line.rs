//! IRC line parsing and formatting.
//!
//! Only the handful of commands the bot needs are modelled; everything else
//! parses into [`IrcEvent::Other`].
//!
//! ```text
//! [@tags] [:prefix] <command> [params...] [:trailing]
//! ```

use crate::commands::ChatLine;
use nom::{
    IResult,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    sequence::preceded,
};
use std::fmt;

/// RFC 2812 parameter limit.
const MAX_PARAMS: usize = 15;

/// Borrowed view of one inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage<'a> {
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: Vec<&'a str>,
}

impl<'a> RawMessage<'a> {
    /// Parse one line; `None` when there is no command.
    pub fn parse(line: &'a str) -> Option<Self> {
        parse_message(line).ok().map(|(_, msg)| msg)
    }

    /// Nick part of the prefix (`nick!user@host`).
    pub fn nick(&self) -> Option<&'a str> {
        self.prefix
            .map(|p| p.split_once('!').map_or(p, |(nick, _)| nick))
    }
}

fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// 1*letter or 3digit.
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;
    let letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let numeric = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());
    if letters || numeric {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::AlphaNumeric,
        )))
    }
}

fn parse_params(input: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut rest = input.trim_end_matches(['\r', '\n']);

    while params.len() < MAX_PARAMS {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }
        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }
    params
}

fn parse_message(input: &str) -> IResult<&str, RawMessage<'_>> {
    let (input, _tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let params = parse_params(input);
    Ok(("", RawMessage { prefix, command, params }))
}

/// What the bot cares about in an inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrcEvent {
    /// Server keepalive; answer with the same token.
    Ping(String),
    /// `001`: registration complete.
    Welcome,
    Privmsg(ChatLine),
    Other,
}

impl IrcEvent {
    pub fn parse(line: &str) -> Self {
        let Some(msg) = RawMessage::parse(line) else {
            return Self::Other;
        };

        match msg.command.to_ascii_uppercase().as_str() {
            "PING" => Self::Ping(msg.params.first().copied().unwrap_or_default().to_string()),
            "001" => Self::Welcome,
            "PRIVMSG" => match (msg.nick(), msg.params.as_slice()) {
                (Some(sender), [target, text, ..]) => {
                    Self::Privmsg(ChatLine::new(sender, target, text))
                }
                _ => Self::Other,
            },
            _ => Self::Other,
        }
    }
}

/// Outbound commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Nick(String),
    User { username: String, realname: String },
    Join(String),
    Pong(String),
    Privmsg { target: String, text: String },
}

impl Command {
    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::Privmsg {
            target: target.to_string(),
            text: text.to_string(),
        }
    }
}

/// Wire form without the line terminator. Line breaks inside text are
/// replaced with spaces so one command is always one line.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nick(nick) => write!(f, "NICK {nick}"),
            Self::User { username, realname } => write!(f, "USER {username} 0 * :{realname}"),
            Self::Join(channel) => write!(f, "JOIN {channel}"),
            Self::Pong(token) => write!(f, "PONG :{token}"),
            Self::Privmsg { target, text } => {
                write!(f, "PRIVMSG {target} :{}", text.replace(['\r', '\n'], " "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_message() {
        let msg = RawMessage::parse("@time=x :alice!a@host PRIVMSG #tpp :hello there").unwrap();
        assert_eq!(msg.prefix, Some("alice!a@host"));
        assert_eq!(msg.nick(), Some("alice"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#tpp", "hello there"]);
    }

    #[test]
    fn test_parse_without_prefix() {
        let msg = RawMessage::parse("PING :irc.example.net\r\n").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.params, vec!["irc.example.net"]);
    }

    #[test]
    fn test_parse_collapses_separators() {
        let msg = RawMessage::parse(":srv 001  feedbot   :Welcome").unwrap();
        assert_eq!(msg.params, vec!["feedbot", "Welcome"]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RawMessage::parse("").is_none());
        assert!(RawMessage::parse(":only.prefix").is_none());
        assert!(RawMessage::parse("12 x").is_none());
    }

    #[test]
    fn test_events() {
        assert_eq!(IrcEvent::parse("PING :abc"), IrcEvent::Ping("abc".into()));
        assert_eq!(IrcEvent::parse(":srv 001 feedbot :Welcome"), IrcEvent::Welcome);
        assert_eq!(
            IrcEvent::parse(":bob!b@h privmsg feedbot :!help"),
            IrcEvent::Privmsg(ChatLine::new("bob", "feedbot", "!help"))
        );
        assert_eq!(IrcEvent::parse(":srv PRIVMSG #tpp"), IrcEvent::Other);
        assert_eq!(IrcEvent::parse(":srv NOTICE * :hi"), IrcEvent::Other);
    }

    #[test]
    fn test_command_wire_form() {
        assert_eq!(Command::Nick("feedbot".into()).to_string(), "NICK feedbot");
        assert_eq!(
            Command::User {
                username: "bot".into(),
                realname: "feedbot".into()
            }
            .to_string(),
            "USER bot 0 * :feedbot"
        );
        assert_eq!(Command::Pong("abc".into()).to_string(), "PONG :abc");
        assert_eq!(
            Command::privmsg("#tpp", "a\r\nb").to_string(),
            "PRIVMSG #tpp :a  b"
        );
    }
}
