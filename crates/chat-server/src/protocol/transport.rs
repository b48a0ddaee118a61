//! Frame transport abstraction
//!
//! The session layer only needs to receive frames, send frames, and close.
//! Anything that is a `Stream` of decoded frames and a `Sink` of outgoing
//! text qualifies, so a TCP socket and an in-memory duplex pipe look the same.

use super::{FrameCodec, FrameError};
use futures::{Sink, Stream};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;

/// A bidirectional channel of text frames
///
/// A read error or end of stream means the connection is broken; a session
/// treats both as a disconnect.
pub trait FrameTransport:
    Stream<Item = Result<String, FrameError>> + Sink<String, Error = FrameError> + Send + Unpin + 'static
{
}

impl<T> FrameTransport for T where
    T: Stream<Item = Result<String, FrameError>>
        + Sink<String, Error = FrameError>
        + Send
        + Unpin
        + 'static
{
}

/// Wrap a byte stream (TCP socket, duplex pipe) in the frame codec
pub fn frame_transport<IO>(io: IO) -> Framed<IO, FrameCodec>
where
    IO: AsyncRead + AsyncWrite,
{
    Framed::new(io, FrameCodec::new())
}
