//! Status values reported by the target in the response code byte.

use crate::error::ProtocolError;

/// Known status values of a response.
///
/// The response code byte is opaque at the framing layer; this enum only
/// names the values the firmware is known to send. Unknown values are not
/// a decode error, they simply do not map to a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResponseCode {
    /// Request handled.
    Ok = 0x00,
    /// No handler is registered for the operation code.
    UnknownOperationCode = 0x01,
    /// The payload was understood but its values were rejected.
    InvalidArguments = 0x02,
    /// The payload was shorter than the operation requires.
    PayloadMissingParts = 0x03,
    /// An index or value was out of range.
    OutOfBounds = 0x04,
    /// The payload type does not match the addressed value.
    TypeMismatch = 0x05,
    /// The operation is not permitted in the current state.
    NotAllowed = 0x06,
    /// The target gave up waiting for the rest of the request.
    TimedOut = 0x07,
    /// The target detected a corrupted request.
    Corrupted = 0x08,
}

impl ResponseCode {
    /// Create a response code from a raw byte value.
    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0x00 => Ok(Self::Ok),
            0x01 => Ok(Self::UnknownOperationCode),
            0x02 => Ok(Self::InvalidArguments),
            0x03 => Ok(Self::PayloadMissingParts),
            0x04 => Ok(Self::OutOfBounds),
            0x05 => Ok(Self::TypeMismatch),
            0x06 => Ok(Self::NotAllowed),
            0x07 => Ok(Self::TimedOut),
            0x08 => Ok(Self::Corrupted),
            _ => Err(ProtocolError::UnknownResponseCode(value)),
        }
    }

    /// Raw byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this code reports success.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> Self {
        code.as_u8()
    }
}

impl TryFrom<u8> for ResponseCode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_from_u8() {
        assert_eq!(ResponseCode::from_u8(0x00).unwrap(), ResponseCode::Ok);
        assert_eq!(ResponseCode::from_u8(0x08).unwrap(), ResponseCode::Corrupted);
        assert!(ResponseCode::from_u8(0x09).is_err());
        assert!(ResponseCode::from_u8(0xFF).is_err());
    }

    #[test]
    fn test_response_code_byte_values() {
        for value in 0x00..=0x08u8 {
            let code = ResponseCode::try_from(value).unwrap();
            assert_eq!(u8::from(code), value);
        }
        assert!(ResponseCode::Ok.is_ok());
        assert!(!ResponseCode::NotAllowed.is_ok());
    }
}
