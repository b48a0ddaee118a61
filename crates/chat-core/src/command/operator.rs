//! Operator console grammar

use super::client::argument_of;

const KICK: &str = "/kick";

/// A command typed on the server operator's console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand<'a> {
    /// Forcefully remove a user
    Kick(&'a str),
    /// `/kick` without a name
    KickUsage,
    /// Anything else is broadcast as a server message
    Broadcast(&'a str),
}

impl<'a> OperatorCommand<'a> {
    /// Classify one console line; `None` for blank lines
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command = match argument_of(line, KICK) {
            Some("") => Self::KickUsage,
            Some(name) => Self::Kick(name),
            None => Self::Broadcast(line),
        };

        Some(command)
    }
}
