//! Chat server setup
//!
//! TCP accept loop, shutdown, and the process-level entry point.

mod state;

pub use state::ServerState;

use crate::console::ConsoleCommandSource;
use crate::handlers::serve_connection;
use crate::protocol::frame_transport;
use chat_common::{AppConfig, AppError, AppResult};
use chat_core::notice;
use std::future::Future;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

/// Pause after a failed accept (e.g. out of file descriptors)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept connections until `shutdown` resolves
///
/// On shutdown every user is told, every connection (named or still at the
/// prompt) is closed, and connection tasks get the flush grace to finish.
pub async fn serve<F>(listener: TcpListener, state: ServerState, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()>,
{
    let addr = listener.local_addr()?;
    tracing::info!(addr = %addr, "Chat server listening");

    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        tracing::debug!(peer = %peer, error = %e, "Failed to set TCP_NODELAY");
                    }
                    connections.spawn(serve_connection(
                        state.clone(),
                        frame_transport(stream),
                        Some(peer),
                    ));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
            Some(finished) = connections.join_next(), if !connections.is_empty() => {
                if let Err(e) = finished {
                    tracing::warn!(error = %e, "Connection task failed");
                }
            }
        }
    }

    tracing::info!(
        connections = state.connection_manager().connection_count(),
        "Shutting down"
    );
    state.router().announce(notice::SERVER_SHUTDOWN);
    state.connection_manager().close_all();

    let grace = state.config().session.flush_grace();
    let drained = tokio::time::timeout(grace, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            remaining = connections.len(),
            "Connections still flushing at shutdown, aborting"
        );
        connections.shutdown().await;
    }

    tracing::info!("Chat server stopped");
    Ok(())
}

/// Run the chat server with configuration
///
/// Binds the configured address, starts the operator console on
/// stdin/stdout, and serves until Ctrl-C.
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {addr}: {e}")))?;

    let state = ServerState::new(config);

    let console = ConsoleCommandSource::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        state.router().clone(),
    );
    tokio::spawn(async move {
        if let Err(e) = console.run().await {
            tracing::warn!(error = %e, "Operator console stopped");
        }
    });

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl-C received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
