//! Outbound writer task
//!
//! Each session has one writer draining its queue into the transport, so a
//! slow or stuck peer only ever stalls its own writer.

use crate::protocol::FrameError;
use futures::Sink;
use futures_util::SinkExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Drain `outbound` into `sink` until shutdown, then flush and close
///
/// Frames queued before shutdown are still written, bounded by `flush_grace`,
/// so a final notice reaches a kicked or quitting user.
pub(crate) async fn write_outbound<S>(
    mut sink: S,
    mut outbound: mpsc::Receiver<String>,
    shutdown: CancellationToken,
    flush_grace: Duration,
    session_id: String,
) where
    S: Sink<String, Error = FrameError> + Unpin,
{
    let healthy = tokio::select! {
        healthy = pump(&mut sink, &mut outbound, &session_id) => healthy,
        () = shutdown.cancelled() => true,
    };

    // No new frames from here on
    outbound.close();

    let finish = async {
        if healthy {
            pump(&mut sink, &mut outbound, &session_id).await;
        }
        sink.close().await
    };

    match tokio::time::timeout(flush_grace, finish).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::debug!(session_id = %session_id, error = %e, "Error closing transport");
        }
        Err(_) => {
            tracing::debug!(session_id = %session_id, "Flush grace elapsed, dropping transport");
        }
    }
}

/// Write frames until the queue ends; `false` if the transport broke
async fn pump<S>(sink: &mut S, outbound: &mut mpsc::Receiver<String>, session_id: &str) -> bool
where
    S: Sink<String, Error = FrameError> + Unpin,
{
    while let Some(frame) = outbound.recv().await {
        match sink.send(frame).await {
            Ok(()) => {}
            Err(e) if !e.is_fatal() => {
                tracing::warn!(session_id = %session_id, error = %e, "Dropping outbound frame");
            }
            Err(e) => {
                tracing::debug!(session_id = %session_id, error = %e, "Outbound write failed");
                return false;
            }
        }
    }
    true
}
