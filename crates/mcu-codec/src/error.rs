//! Codec error types.

use mcu_protocol::ProtocolError;
use thiserror::Error;

/// Errors raised while moving frames over a transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// A complete frame failed to decode.
    ///
    /// Framing is unaffected; the next frame can still be read.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The transport failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport closed in the middle of a frame.
    #[error("connection closed with a partial frame buffered")]
    ConnectionClosed,
}

impl CodecError {
    /// Check if reading may continue after this error.
    ///
    /// Decode failures are reported per frame; transport failures end the
    /// read loop.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}
