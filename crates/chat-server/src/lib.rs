//! # chat-server
//!
//! Line-oriented TCP chat server: a registry of uniquely named sessions,
//! a router for global and private messages, and an operator console.

pub mod broadcast;
pub mod connection;
pub mod console;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use broadcast::{KickOutcome, MessageRouter};
pub use connection::{ConnectionManager, SessionHandle, UserRegistry};
pub use console::ConsoleCommandSource;
pub use handlers::{serve_connection, SessionHandler, SessionState};
pub use protocol::{frame_transport, FrameCodec, FrameError, FrameTransport};
pub use server::{run, serve, ServerState};
