//! Session handle
//!
//! The capability the registry and router hold for a session: queue a frame
//! for it or force it closed. The raw transport stays with the session task.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Who owns the departure of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Disposition {
    /// Still chatting
    Open = 0,
    /// The session is closing on its own (quit, disconnect)
    Leaving = 1,
    /// The operator removed the session
    Kicked = 2,
}

/// Errors from queueing a frame on a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The session is closed or closing
    #[error("session is closed")]
    Closed,

    /// The recipient is not draining its queue; the frame was dropped
    #[error("outbound queue is full")]
    Full,
}

/// Shared handle to one connected session
///
/// Cloning is cheap; every clone refers to the same session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    /// Unique session ID
    session_id: String,
    /// Outbound frame queue, drained by the session's writer task
    sender: mpsc::Sender<String>,
    /// Cancelled exactly when the session must stop
    shutdown: CancellationToken,
    /// Departure ownership, see [`Disposition`]
    disposition: AtomicU8,
    /// Connection creation time
    created_at: Instant,
}

impl SessionHandle {
    /// Create a handle with a fresh session ID
    ///
    /// Returns the receiving end of the outbound queue, which belongs to the
    /// session's writer task.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<String>) {
        Self::with_id(Self::generate_id(), buffer)
    }

    /// Create a handle with a given session ID
    pub fn with_id(session_id: String, buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = Self {
            inner: Arc::new(HandleInner {
                session_id,
                sender,
                shutdown: CancellationToken::new(),
                disposition: AtomicU8::new(Disposition::Open as u8),
                created_at: Instant::now(),
            }),
        };
        (handle, receiver)
    }

    /// Generate a new session ID
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Queue a frame for this session without waiting
    ///
    /// Delivery is best-effort: a closed session or a full queue rejects the
    /// frame and the caller decides whether to care.
    pub fn send(&self, text: impl Into<String>) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }

        self.inner.sender.try_send(text.into()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::Full,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }

    /// Close the session from outside
    ///
    /// Unblocks the session's pending read and lets the writer flush frames
    /// already queued. Idempotent.
    pub fn force_close(&self) {
        self.inner.shutdown.cancel();
    }

    /// Wait until the session has been closed
    pub async fn closed(&self) {
        self.inner.shutdown.cancelled().await;
    }

    /// Check if the session has been closed
    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Token the writer task watches for shutdown
    pub(crate) fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    /// Claim the departure as an operator kick
    ///
    /// Returns `false` if the session already began leaving on its own (or was
    /// already kicked); the caller must then not announce anything.
    pub fn claim_kick(&self) -> bool {
        self.claim(Disposition::Kicked)
    }

    /// Claim the departure as a voluntary leave
    ///
    /// Returns `false` if the operator kicked the session first.
    pub fn claim_departure(&self) -> bool {
        self.claim(Disposition::Leaving)
    }

    /// Check if the operator kicked this session
    pub fn was_kicked(&self) -> bool {
        self.inner.disposition.load(Ordering::SeqCst) == Disposition::Kicked as u8
    }

    fn claim(&self, to: Disposition) -> bool {
        self.inner
            .disposition
            .compare_exchange(
                Disposition::Open as u8,
                to as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Check if two handles refer to the same session
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.inner.created_at.elapsed()
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session_id", &self.inner.session_id)
            .field("closed", &self.is_closed())
            .field("kicked", &self.was_kicked())
            .finish()
    }
}
