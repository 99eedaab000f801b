//! Protocol-level error types.

use thiserror::Error;

/// Errors raised while building or interpreting protocol frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The buffer does not have the length its header declares.
    ///
    /// Raised when the buffer is too short to contain a header, or when its
    /// total length differs from the header size plus the declared payload
    /// length.
    #[error("malformed frame: expected {expected} bytes, got {actual}")]
    MalformedFrame {
        /// Length implied by the header (or the bare header size when the
        /// header itself is incomplete).
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// The payload does not fit in the single-byte length field.
    #[error("payload of {size} bytes exceeds maximum of {max}")]
    PayloadTooLarge {
        /// Offered payload size.
        size: usize,
        /// Maximum payload size.
        max: usize,
    },

    /// The response code is not one of the known status values.
    #[error("unknown response code: {0:#04x}")]
    UnknownResponseCode(u8),
}

impl ProtocolError {
    /// Check if this error came from a length mismatch on decode.
    #[must_use]
    pub fn is_malformed_frame(&self) -> bool {
        matches!(self, Self::MalformedFrame { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::MalformedFrame {
            expected: 5,
            actual: 4,
        };
        assert_eq!(err.to_string(), "malformed frame: expected 5 bytes, got 4");
        assert!(err.is_malformed_frame());

        let err = ProtocolError::UnknownResponseCode(0x2A);
        assert_eq!(err.to_string(), "unknown response code: 0x2a");
        assert!(!err.is_malformed_frame());
    }
}
