//! Length-prefixed text frame codec

use bytes::{Buf, BufMut, BytesMut};
use std::string::FromUtf8Error;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

/// Largest payload a single frame can carry, in bytes
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Size of the length prefix
const HEADER_LEN: usize = 2;

/// Frame codec errors
#[derive(Debug, Error)]
pub enum FrameError {
    /// Underlying socket failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer sent bytes that are not valid UTF-8
    #[error("Frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// Outgoing text does not fit in one frame
    #[error("Frame too long: {len} bytes (max 65535)")]
    TooLong { len: usize },
}

impl FrameError {
    /// Check if the connection is unusable after this error
    ///
    /// An oversized outgoing frame is rejected before anything is written,
    /// so the connection itself is still intact.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TooLong { .. })
    }
}

/// Codec for `u16` length-prefixed UTF-8 frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Create a new codec
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Decoder for FrameCodec {
    type Item = String;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }

        let len = usize::from(u16::from_be_bytes([src[0], src[1]]));
        let frame_len = HEADER_LEN + len;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LEN);
        let payload = src.split_to(len);
        Ok(Some(String::from_utf8(payload.to_vec())?))
    }
}

impl<T: AsRef<str>> Encoder<T> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let payload = item.as_ref().as_bytes();
        let len = u16::try_from(payload.len()).map_err(|_| FrameError::TooLong {
            len: payload.len(),
        })?;

        dst.reserve(HEADER_LEN + payload.len());
        dst.put_u16(len);
        dst.extend_from_slice(payload);
        Ok(())
    }
}
