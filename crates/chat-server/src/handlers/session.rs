//! Session state machine
//!
//! Drives one connection from the username handshake through the command
//! loop to cleanup:
//!
//! ```text
//! Connecting -> AwaitingUsername -> Active -> Closing -> Closed
//!                      |                        ^
//!                      +------------------------+  (read failure, EOF, kick)
//! ```

use crate::broadcast::{deliver, record_message, MessageRouter};
use crate::connection::SessionHandle;
use crate::protocol::FrameError;
use chat_core::notice;
use chat_core::{ClientCommand, Username};
use futures::Stream;
use futures_util::StreamExt;
use std::net::SocketAddr;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted, nothing sent yet
    Connecting,
    /// Prompting until a free username is given
    AwaitingUsername,
    /// Registered and reading commands
    Active,
    /// Leaving; cleanup pending
    Closing,
    /// Terminal
    Closed,
}

/// Per-connection command handler
///
/// Owns the read half of the transport. Everything it sends goes through its
/// [`SessionHandle`], the same way other sessions reach it.
pub struct SessionHandler<R> {
    frames: R,
    handle: SessionHandle,
    router: MessageRouter,
    state: SessionState,
    username: Option<Username>,
    peer: Option<SocketAddr>,
}

impl<R> SessionHandler<R>
where
    R: Stream<Item = Result<String, FrameError>> + Unpin,
{
    /// Create a handler in the `Connecting` state
    pub fn new(frames: R, handle: SessionHandle, router: MessageRouter) -> Self {
        Self {
            frames,
            handle,
            router,
            state: SessionState::Connecting,
            username: None,
            peer: None,
        }
    }

    /// Attach the remote address for logging
    #[must_use]
    pub fn with_peer(mut self, peer: Option<SocketAddr>) -> Self {
        self.peer = peer;
        self
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current username, once registered
    pub fn username(&self) -> Option<&str> {
        self.username.as_ref().map(Username::as_str)
    }

    /// Run the state machine until `Closed`
    pub async fn run(&mut self) {
        loop {
            self.state = match self.state {
                SessionState::Connecting => SessionState::AwaitingUsername,
                SessionState::AwaitingUsername => self.await_username().await,
                SessionState::Active => self.command_loop().await,
                SessionState::Closing => {
                    self.cleanup();
                    SessionState::Closed
                }
                SessionState::Closed => break,
            };
        }
    }

    async fn await_username(&mut self) -> SessionState {
        loop {
            self.reply(notice::USERNAME_PROMPT);

            let Some(requested) = self.read_frame().await else {
                return SessionState::Closing;
            };

            match self.router.registry().register(&requested, &self.handle) {
                Ok(username) => {
                    self.reply(notice::USERNAME_ACCEPTED);
                    self.router.announce(&notice::joined(username.as_str()));

                    tracing::info!(
                        session_id = %self.handle.session_id(),
                        username = %username,
                        peer = ?self.peer,
                        "User joined"
                    );

                    self.username = Some(username);
                    return SessionState::Active;
                }
                Err(e) => {
                    tracing::debug!(
                        session_id = %self.handle.session_id(),
                        code = e.code(),
                        "Username rejected"
                    );
                    self.reply(notice::USERNAME_REJECTED);
                }
            }
        }
    }

    async fn command_loop(&mut self) -> SessionState {
        loop {
            let Some(line) = self.read_frame().await else {
                return SessionState::Closing;
            };
            let Some(command) = ClientCommand::parse(&line) else {
                continue;
            };
            let Some(me) = self.username.clone() else {
                return SessionState::Closing;
            };

            record_message(Some(me.as_str()), line.trim());

            if let Some(next) = self.dispatch(&me, command) {
                return next;
            }
        }
    }

    /// Execute one command; `Some` leaves the command loop
    fn dispatch(&mut self, me: &Username, command: ClientCommand<'_>) -> Option<SessionState> {
        match command {
            ClientCommand::Help => self.reply(notice::HELP_TEXT),
            ClientCommand::Quit => {
                self.reply(notice::FAREWELL);
                return Some(SessionState::Closing);
            }
            ClientCommand::Rename(candidate) => {
                match self
                    .router
                    .registry()
                    .rename(me.as_str(), candidate, &self.handle)
                {
                    Ok(new) => {
                        self.reply(&notice::rename_succeeded(new.as_str()));
                        self.router
                            .announce(&notice::renamed(me.as_str(), new.as_str()));
                        self.username = Some(new);
                    }
                    Err(e) => {
                        tracing::debug!(
                            session_id = %self.handle.session_id(),
                            code = e.code(),
                            "Rename rejected"
                        );
                        self.reply(notice::RENAME_FAILED);
                    }
                }
            }
            ClientCommand::PrivateMessage { target, text } => {
                if self.router.send_private(me.as_str(), target, text).is_err() {
                    self.reply(&notice::user_not_found(target));
                }
            }
            ClientCommand::InvalidPrivateMessage => self.reply(notice::PRIVATE_MESSAGE_USAGE),
            ClientCommand::All(text) => {
                if !text.is_empty() {
                    self.router.broadcast_global(Some(me.as_str()), text);
                }
            }
            ClientCommand::Say(text) => {
                self.router.broadcast_global(Some(me.as_str()), text);
            }
        }
        None
    }

    /// Unregister, announce the departure if this session owns it, and close
    fn cleanup(&mut self) {
        if let Some(username) = self.username.take() {
            // A kick that already claimed the departure announces it instead
            let self_initiated = self.handle.claim_departure();
            let removed = self
                .router
                .registry()
                .unregister_session(username.as_str(), &self.handle);

            if self_initiated && removed {
                self.router.announce(&notice::left(username.as_str()));
            }

            tracing::info!(
                session_id = %self.handle.session_id(),
                username = %username,
                kicked = !self_initiated,
                "User left"
            );
        }

        self.handle.force_close();
    }

    /// Next frame, or `None` once the peer is gone or the session was closed
    async fn read_frame(&mut self) -> Option<String> {
        tokio::select! {
            biased;

            () = self.handle.closed() => {
                tracing::debug!(
                    session_id = %self.handle.session_id(),
                    "Session closed while reading"
                );
                None
            }
            frame = self.frames.next() => match frame {
                Some(Ok(line)) => Some(line),
                Some(Err(e)) => {
                    tracing::debug!(
                        session_id = %self.handle.session_id(),
                        error = %e,
                        "Read failed"
                    );
                    None
                }
                None => {
                    tracing::debug!(
                        session_id = %self.handle.session_id(),
                        "Peer disconnected"
                    );
                    None
                }
            },
        }
    }

    fn reply(&self, text: &str) {
        deliver(&self.handle, text);
    }
}

impl<R> std::fmt::Debug for SessionHandler<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandler")
            .field("session_id", &self.handle.session_id())
            .field("state", &self.state)
            .field("username", &self.username)
            .field("peer", &self.peer)
            .finish()
    }
}
