//! Client error types.

use mcu_codec::CodecError;
use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A response frame failed to decode.
    #[error("protocol error: {0}")]
    Protocol(#[from] mcu_protocol::ProtocolError),

    /// Framing layer error not covered by another variant.
    #[error("codec error: {0}")]
    Codec(#[source] CodecError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// No response arrived within the configured timeout.
    #[error("response timed out")]
    ResponseTimeout,

    /// Transport closed before a response arrived.
    #[error("connection closed")]
    ConnectionClosed,
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Protocol(e) => Self::Protocol(e),
            CodecError::Io(e) => Self::Io(e),
            CodecError::ConnectionClosed => Self::ConnectionClosed,
            other => Self::Codec(other),
        }
    }
}

impl Error {
    /// Check if this error is transient and may succeed on retry.
    ///
    /// Timeouts and transport failures are transient; a malformed frame
    /// or a bad configuration is not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ResponseTimeout | Self::ConnectionClosed | Self::Io(_)
        )
    }

    /// Check if this error came from a frame that failed to decode.
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use mcu_protocol::ProtocolError;

    #[test]
    fn test_codec_errors_flatten() {
        let err: Error = CodecError::ConnectionClosed.into();
        assert!(matches!(err, Error::ConnectionClosed));

        let err: Error = CodecError::Protocol(ProtocolError::MalformedFrame {
            expected: 5,
            actual: 4,
        })
        .into();
        assert!(err.is_protocol_error());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient() {
        assert!(Error::ResponseTimeout.is_transient());
        assert!(Error::ConnectionClosed.is_transient());
        assert!(Error::Io(std::io::ErrorKind::BrokenPipe.into()).is_transient());
        assert!(!Error::Config("bad".into()).is_transient());
    }
}
