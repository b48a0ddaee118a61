//! Client command grammar
//!
//! A line is classified by the first matching rule, in this order:
//!
//! | Input | Command |
//! |---|---|
//! | `/help` (any case) | [`ClientCommand::Help`] |
//! | `/quit` (any case) | [`ClientCommand::Quit`] |
//! | `/rename <name>` | [`ClientCommand::Rename`] |
//! | `/msg <user> <text>` | [`ClientCommand::PrivateMessage`] |
//! | `/all <text>` | [`ClientCommand::All`] |
//! | anything else | [`ClientCommand::Say`] |

const HELP: &str = "/help";
const QUIT: &str = "/quit";
const RENAME: &str = "/rename";
const MSG: &str = "/msg";
const ALL: &str = "/all";

/// A command sent by a connected chat client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand<'a> {
    /// Show the command help text
    Help,
    /// Leave the chat
    Quit,
    /// Change username; the candidate is trimmed but not validated
    Rename(&'a str),
    /// Private message to a single user
    PrivateMessage {
        /// Recipient username
        target: &'a str,
        /// Message body, spaces preserved
        text: &'a str,
    },
    /// `/msg` without both a recipient and a body
    InvalidPrivateMessage,
    /// Explicit global message; may be empty, in which case nothing is sent
    All(&'a str),
    /// Implicit global message (no recognized prefix)
    Say(&'a str),
}

impl<'a> ClientCommand<'a> {
    /// Classify one received line
    ///
    /// Returns `None` for blank lines, which are ignored by the session.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command = if line.eq_ignore_ascii_case(HELP) {
            Self::Help
        } else if line.eq_ignore_ascii_case(QUIT) {
            Self::Quit
        } else if let Some(candidate) = argument_of(line, RENAME) {
            Self::Rename(candidate)
        } else if let Some(rest) = argument_of(line, MSG) {
            Self::parse_private(rest)
        } else if let Some(text) = argument_of(line, ALL) {
            Self::All(text)
        } else {
            Self::Say(line)
        };

        Some(command)
    }

    /// Split `<user> <text>`; the text is kept as-is after the separating whitespace
    fn parse_private(rest: &'a str) -> Self {
        let Some((target, text)) = rest.split_once(char::is_whitespace) else {
            return Self::InvalidPrivateMessage;
        };

        let text = text.trim_start();
        if target.is_empty() || text.is_empty() {
            return Self::InvalidPrivateMessage;
        }

        Self::PrivateMessage { target, text }
    }

    /// Check if this command ends the session
    #[must_use]
    pub const fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }
}

/// Match `word` alone or followed by whitespace, returning the trimmed remainder
///
/// A trimmed line loses the space after a bare command word, so `"/all   "`
/// arrives as `"/all"` and still counts as `/all` with an empty argument.
pub(crate) fn argument_of<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    match line.strip_prefix(word)? {
        "" => Some(""),
        rest if rest.starts_with(char::is_whitespace) => Some(rest.trim()),
        _ => None,
    }
}
