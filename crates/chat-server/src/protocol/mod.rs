//! Wire protocol
//!
//! Every message in either direction is one frame: a big-endian `u16` byte
//! length followed by that many bytes of UTF-8 text.

mod codec;
mod transport;

pub use codec::{FrameCodec, FrameError, MAX_FRAME_LEN};
pub use transport::{frame_transport, FrameTransport};
