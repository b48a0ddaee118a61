//! Connection handlers
//!
//! Wires an accepted transport to a session: outbound writer task, session
//! state machine, and connection bookkeeping.

mod session;

pub use session::{SessionHandler, SessionState};

use crate::connection::{write_outbound, SessionHandle};
use crate::protocol::FrameTransport;
use crate::server::ServerState;
use futures_util::StreamExt;
use std::net::SocketAddr;

/// Serve one connection until it is closed
///
/// Returns once the session has reached `Closed` and its writer has flushed
/// and released the transport.
pub async fn serve_connection<T>(state: ServerState, transport: T, peer: Option<SocketAddr>)
where
    T: FrameTransport,
{
    let session_config = &state.config().session;
    let (handle, outbound) = SessionHandle::new(session_config.outbound_buffer);
    let session_id = handle.session_id().to_string();

    let (sink, frames) = transport.split();
    let writer = tokio::spawn(write_outbound(
        sink,
        outbound,
        handle.shutdown_token(),
        session_config.flush_grace(),
        session_id.clone(),
    ));

    state.connection_manager().add_connection(&handle);
    tracing::info!(session_id = %session_id, peer = ?peer, "Connection established");

    let mut session =
        SessionHandler::new(frames, handle, state.router().clone()).with_peer(peer);
    session.run().await;

    state.connection_manager().remove_connection(&session_id);

    if let Err(e) = writer.await {
        tracing::warn!(session_id = %session_id, error = %e, "Writer task failed");
    }

    tracing::info!(session_id = %session_id, "Connection closed");
}
