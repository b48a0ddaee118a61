//! Message router
//!
//! Builds on the registry: every delivery is a non-blocking queue push on a
//! session handle, so one slow or broken recipient never holds up the rest.

use super::record_message;
use crate::connection::{SendError, SessionHandle, UserRegistry};
use chat_core::notice::{self, Envelope};
use chat_core::DomainError;
use std::sync::Arc;

/// What an operator kick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum KickOutcome {
    /// No session holds that name; nothing was broadcast
    NotFound,
    /// The session was already leaving on its own; its own departure notice
    /// stands and nothing more was broadcast
    AlreadyLeaving,
    /// The session was notified, closed, and its removal announced
    Kicked,
}

/// Routes chat messages to registered sessions
#[derive(Clone)]
pub struct MessageRouter {
    registry: Arc<UserRegistry>,
}

impl MessageRouter {
    /// Create a router over a registry
    #[must_use]
    pub fn new(registry: Arc<UserRegistry>) -> Self {
        Self { registry }
    }

    /// Get the registry this router delivers through
    pub fn registry(&self) -> &Arc<UserRegistry> {
        &self.registry
    }

    /// Send a message to every registered session
    ///
    /// `from: None` marks a server message. Returns how many sessions accepted
    /// the frame; failures are never reported to the author.
    pub fn broadcast_global(&self, from: Option<&str>, text: &str) -> usize {
        let frame = Envelope::Global { from, text }.to_string();
        let recipients = self.registry.snapshot();
        let total = recipients.len();

        let sent = recipients
            .iter()
            .filter(|handle| deliver(handle, &frame))
            .count();

        tracing::trace!(sent = sent, total = total, "Message broadcast");

        sent
    }

    /// Broadcast a server message and record it in the message log
    pub fn announce(&self, text: &str) -> usize {
        record_message(None, text);
        self.broadcast_global(None, text)
    }

    /// Send a private message to one user
    ///
    /// Fails only if `to` is not registered. A registered recipient that
    /// cannot take the frame is not the sender's problem.
    pub fn send_private(&self, from: &str, to: &str, text: &str) -> Result<(), DomainError> {
        let handle = self
            .registry
            .lookup(to)
            .ok_or_else(|| DomainError::UserNotFound(to.to_string()))?;

        let frame = Envelope::Private { from, text }.to_string();
        deliver(&handle, &frame);

        Ok(())
    }

    /// Remove a user on the operator's behalf
    ///
    /// The target gets a final notice, is force-closed, and is removed from
    /// the registry; the rest of the room is told. If the session is already
    /// on its way out, it keeps ownership of its departure and nothing is
    /// announced twice.
    pub fn kick(&self, username: &str) -> KickOutcome {
        let Some(handle) = self.registry.lookup(username) else {
            tracing::debug!(username = %username, "Kick target not found");
            return KickOutcome::NotFound;
        };

        if !handle.claim_kick() {
            tracing::debug!(
                session_id = %handle.session_id(),
                username = %username,
                "Kick target already leaving"
            );
            return KickOutcome::AlreadyLeaving;
        }

        deliver(&handle, notice::KICKED);
        handle.force_close();
        // The session's own cleanup may have removed the entry already
        self.registry.unregister_session(username, &handle);
        self.announce(&notice::removed(username));

        tracing::info!(
            session_id = %handle.session_id(),
            username = %username,
            "User kicked"
        );

        KickOutcome::Kicked
    }
}

impl std::fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRouter")
            .field("registry", &self.registry)
            .finish()
    }
}

/// Queue a frame, swallowing the failure
pub(crate) fn deliver(handle: &SessionHandle, frame: &str) -> bool {
    match handle.send(frame) {
        Ok(()) => true,
        Err(SendError::Full) => {
            tracing::warn!(
                session_id = %handle.session_id(),
                "Outbound queue full, frame dropped"
            );
            false
        }
        Err(SendError::Closed) => {
            tracing::trace!(
                session_id = %handle.session_id(),
                "Recipient closed, frame dropped"
            );
            false
        }
    }
}
