//! Server-to-client texts
//!
//! Every line the server itself authors lives here, so the categories a
//! client can see (handshake, announcements, errors, envelopes) stay distinct.

use std::fmt;

/// Sent before each username attempt
pub const USERNAME_PROMPT: &str = "Welcome. Enter your username:";

/// Sent once the username has been registered
pub const USERNAME_ACCEPTED: &str = "Username accepted. Type /help for the list of commands.";

/// Sent when a username is blank or already in use
pub const USERNAME_REJECTED: &str = "Invalid or taken username. Try another:";

/// Sent in reply to `/quit`
pub const FAREWELL: &str = "Leaving the chat. Goodbye!";

/// Sent when `/rename` fails
pub const RENAME_FAILED: &str = "Could not rename (empty or already taken).";

/// Sent when `/msg` lacks a recipient or a body
pub const PRIVATE_MESSAGE_USAGE: &str = "Usage: /msg USER MESSAGE";

/// Final notice delivered to a kicked user before disconnection
pub const KICKED: &str = "You have been removed from the chat by the administrator.";

/// Broadcast when the server stops accepting and closes every session
pub const SERVER_SHUTDOWN: &str = "The server is shutting down.";

/// Printed on the operator console for `/kick` without a name
pub const KICK_USAGE: &str = "Usage: /kick USERNAME";

/// Reply to `/help`
pub const HELP_TEXT: &str = "\
Commands:
  /rename NEW_NAME      -> change your name
  /msg USER MESSAGE     -> send a private message
  /all MESSAGE          -> send a message to everyone
  /quit                 -> leave the chat
Messages without a command are sent to everyone.";

/// Operator console banner
pub const OPERATOR_HELP: &str = "\
Operator commands:
  /kick USERNAME        -> remove a user from the chat
Any other line is broadcast to everyone as [Server].";

/// Announcement that a user joined
pub fn joined(username: &str) -> String {
    format!("{username} joined the chat.")
}

/// Announcement that a user left on their own
pub fn left(username: &str) -> String {
    format!("{username} left the chat.")
}

/// Announcement that a user changed name
pub fn renamed(old: &str, new: &str) -> String {
    format!("{old} renamed to {new}.")
}

/// Confirmation sent to the user who renamed
pub fn rename_succeeded(new: &str) -> String {
    format!("Your name is now: {new}")
}

/// Announcement that the operator removed a user
pub fn removed(username: &str) -> String {
    format!("{username} was removed from the chat by the administrator.")
}

/// Reply when a private message or kick names an unknown user
pub fn user_not_found(username: &str) -> String {
    format!("User '{username}' not found.")
}

/// A routed chat message, rendered as the frame recipients receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope<'a> {
    /// Message to everyone; `from: None` marks a server-originated message
    Global {
        from: Option<&'a str>,
        text: &'a str,
    },
    /// Message to a single recipient
    Private { from: &'a str, text: &'a str },
}

impl<'a> Envelope<'a> {
    /// Server-originated global message
    #[must_use]
    pub const fn server(text: &'a str) -> Self {
        Self::Global { from: None, text }
    }
}

impl fmt::Display for Envelope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global { from: None, text } => write!(f, "[Server]: {text}"),
            Self::Global {
                from: Some(from),
                text,
            } => write!(f, "[{from}]: {text}"),
            Self::Private { from, text } => write!(f, "[Private][{from}]: {text}"),
        }
    }
}
