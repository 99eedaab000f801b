//! Request and response frame definitions.
//!
//! Requests travel from the host to the target and responses travel back.
//! Both directions use a fixed header with a single-byte payload length,
//! followed by the payload itself:
//!
//! ```text
//! request:  target_id(1) | op_code(1) | payload_length(1) | crc(1) | payload
//! response: response_code(1) | payload_length(1) | crc(1) | payload
//! ```
//!
//! The CRC byte is carried through untouched. It is neither computed on
//! encode nor checked on decode.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProtocolError;
use crate::response_code::ResponseCode;

/// Request header size in bytes.
pub const REQUEST_HEADER_SIZE: usize = 4;

/// Response header size in bytes.
pub const RESPONSE_HEADER_SIZE: usize = 3;

/// Offset of the payload length byte within a request header.
pub const REQUEST_LENGTH_OFFSET: usize = 2;

/// Offset of the payload length byte within a response header.
pub const RESPONSE_LENGTH_OFFSET: usize = 1;

/// Maximum payload size, bounded by the single-byte length field.
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Largest possible request frame.
pub const MAX_REQUEST_FRAME_SIZE: usize = REQUEST_HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Largest possible response frame.
pub const MAX_RESPONSE_FRAME_SIZE: usize = RESPONSE_HEADER_SIZE + MAX_PAYLOAD_SIZE;

fn check_payload_size(payload: &Bytes) -> Result<(), ProtocolError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(())
}

/// Validate that `src` is exactly one frame long according to its header.
fn check_frame_length(
    src: &[u8],
    header_size: usize,
    length_offset: usize,
) -> Result<(), ProtocolError> {
    if src.len() < header_size {
        return Err(ProtocolError::MalformedFrame {
            expected: header_size,
            actual: src.len(),
        });
    }

    let expected = header_size + src[length_offset] as usize;
    if src.len() != expected {
        return Err(ProtocolError::MalformedFrame {
            expected,
            actual: src.len(),
        });
    }

    Ok(())
}

/// A request addressed to a peripheral on the target.
///
/// The payload length is always derived from the payload, so the encoded
/// header can never disagree with the body that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestFrame {
    target_id: u8,
    op_code: u8,
    crc: u8,
    payload: Bytes,
}

impl RequestFrame {
    /// Create a new request with a zero CRC byte.
    pub fn new(target_id: u8, op_code: u8, payload: impl Into<Bytes>) -> Result<Self, ProtocolError> {
        let payload = payload.into();
        check_payload_size(&payload)?;

        Ok(Self {
            target_id,
            op_code,
            crc: 0,
            payload,
        })
    }

    /// Set the CRC byte carried in the header.
    #[must_use]
    pub const fn with_crc(mut self, crc: u8) -> Self {
        self.crc = crc;
        self
    }

    /// Identifier of the addressed peripheral.
    #[must_use]
    pub const fn target_id(&self) -> u8 {
        self.target_id
    }

    /// Operation selector.
    #[must_use]
    pub const fn op_code(&self) -> u8 {
        self.op_code
    }

    /// Opaque CRC byte.
    #[must_use]
    pub const fn crc(&self) -> u8 {
        self.crc
    }

    /// Request payload.
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Payload length as written on the wire.
    #[must_use]
    pub fn payload_length(&self) -> u8 {
        // bounded by check_payload_size at construction
        self.payload.len() as u8
    }

    /// Total encoded size including the header.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        REQUEST_HEADER_SIZE + self.payload.len()
    }

    /// Encode the request to bytes.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.target_id);
        dst.put_u8(self.op_code);
        dst.put_u8(self.payload_length());
        dst.put_u8(self.crc);
        dst.put_slice(&self.payload);
    }

    /// Encode the request to a new `Bytes` buffer.
    #[must_use]
    pub fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Parse a complete request buffer.
    ///
    /// This is the target-side view of the protocol. The buffer must hold
    /// exactly one request.
    pub fn decode(src: &[u8]) -> Result<Self, ProtocolError> {
        check_frame_length(src, REQUEST_HEADER_SIZE, REQUEST_LENGTH_OFFSET)?;

        let mut cursor = src;
        let target_id = cursor.get_u8();
        let op_code = cursor.get_u8();
        let _payload_length = cursor.get_u8();
        let crc = cursor.get_u8();

        Ok(Self {
            target_id,
            op_code,
            crc,
            payload: Bytes::copy_from_slice(cursor),
        })
    }
}

/// A response returned by the target.
///
/// A `ResponseFrame` only exists with a payload whose length matches the
/// length byte it was received with; a mismatching buffer is a decode error,
/// never a partially populated frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseFrame {
    response_code: u8,
    crc: u8,
    payload: Bytes,
}

impl ResponseFrame {
    /// Build a response from its fields.
    pub fn new(response_code: u8, payload: impl Into<Bytes>, crc: u8) -> Result<Self, ProtocolError> {
        let payload = payload.into();
        check_payload_size(&payload)?;

        Ok(Self {
            response_code,
            crc,
            payload,
        })
    }

    /// Parse a complete response buffer.
    ///
    /// Fails with [`ProtocolError::MalformedFrame`] when the buffer is
    /// shorter than the header or its length is not exactly
    /// `payload_length + 3`. The CRC byte is not checked.
    pub fn decode(src: &[u8]) -> Result<Self, ProtocolError> {
        check_frame_length(src, RESPONSE_HEADER_SIZE, RESPONSE_LENGTH_OFFSET)?;

        let mut cursor = src;
        let response_code = cursor.get_u8();
        let _payload_length = cursor.get_u8();
        let crc = cursor.get_u8();

        Ok(Self {
            response_code,
            crc,
            payload: Bytes::copy_from_slice(cursor),
        })
    }

    /// Parse a complete response buffer without copying the payload.
    pub fn decode_bytes(src: Bytes) -> Result<Self, ProtocolError> {
        check_frame_length(&src, RESPONSE_HEADER_SIZE, RESPONSE_LENGTH_OFFSET)?;

        Ok(Self {
            response_code: src[0],
            crc: src[2],
            payload: src.slice(RESPONSE_HEADER_SIZE..),
        })
    }

    /// Raw response code byte.
    #[must_use]
    pub const fn response_code(&self) -> u8 {
        self.response_code
    }

    /// Interpret the response code as a known status value.
    pub fn status(&self) -> Result<ResponseCode, ProtocolError> {
        ResponseCode::from_u8(self.response_code)
    }

    /// Payload length as received on the wire.
    #[must_use]
    pub fn payload_length(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Opaque CRC byte, as received.
    #[must_use]
    pub const fn crc(&self) -> u8 {
        self.crc
    }

    /// Response payload.
    #[must_use]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Consume the frame and return its payload.
    #[must_use]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Total encoded size including the header.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        RESPONSE_HEADER_SIZE + self.payload.len()
    }

    /// Encode the response to bytes.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.response_code);
        dst.put_u8(self.payload_length());
        dst.put_u8(self.crc);
        dst.put_slice(&self.payload);
    }

    /// Encode the response to a new `Bytes` buffer.
    #[must_use]
    pub fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Encode a request into its wire representation.
#[must_use]
pub fn encode_request(request: &RequestFrame) -> Bytes {
    request.encode_to_bytes()
}

/// Decode a complete response buffer.
pub fn decode_response(src: &[u8]) -> Result<ResponseFrame, ProtocolError> {
    ResponseFrame::decode(src)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_request() {
        let request = RequestFrame::new(0x01, 0x01, vec![0x01, 0x02, 0x03, 0x04, 0x05]).unwrap();

        let bytes = encode_request(&request);
        assert_eq!(
            &bytes[..],
            &[0x01, 0x01, 0x05, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05]
        );
        assert_eq!(bytes.len(), request.encoded_len());
    }

    #[test]
    fn test_encode_request_with_crc() {
        let request = RequestFrame::new(0x02, 0x07, &b"\xAA"[..]).unwrap().with_crc(0x5C);

        let bytes = request.encode_to_bytes();
        assert_eq!(&bytes[..], &[0x02, 0x07, 0x01, 0x5C, 0xAA]);
    }

    #[test]
    fn test_encode_empty_request() {
        let request = RequestFrame::new(0x03, 0x10, Bytes::new()).unwrap();

        let bytes = request.encode_to_bytes();
        assert_eq!(&bytes[..], &[0x03, 0x10, 0x00, 0x00]);
        assert_eq!(request.payload_length(), 0);
    }

    #[test]
    fn test_request_payload_too_large() {
        let err = RequestFrame::new(0x01, 0x01, vec![0u8; MAX_PAYLOAD_SIZE + 1]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::PayloadTooLarge {
                size: 256,
                max: 255
            }
        );

        let request = RequestFrame::new(0x01, 0x01, vec![0u8; MAX_PAYLOAD_SIZE]).unwrap();
        assert_eq!(request.payload_length(), 255);
        assert_eq!(request.encoded_len(), MAX_REQUEST_FRAME_SIZE);
    }

    #[test]
    fn test_decode_response() {
        let response = decode_response(&[0x0A, 0x02, 0x00, 0xFF, 0xEE]).unwrap();

        assert_eq!(response.response_code(), 0x0A);
        assert_eq!(response.payload_length(), 2);
        assert_eq!(response.crc(), 0x00);
        assert_eq!(&response.payload()[..], &[0xFF, 0xEE]);
    }

    #[test]
    fn test_decode_zero_payload_response() {
        let response = ResponseFrame::decode(&[0x05, 0x00, 0x00]).unwrap();

        assert_eq!(response.response_code(), 0x05);
        assert_eq!(response.payload_length(), 0);
        assert!(response.payload().is_empty());
    }

    #[test]
    fn test_decode_short_buffer() {
        for len in 0..RESPONSE_HEADER_SIZE {
            let buf = vec![0u8; len];
            let err = ResponseFrame::decode(&buf).unwrap_err();
            assert_eq!(
                err,
                ProtocolError::MalformedFrame {
                    expected: 3,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn test_decode_length_mismatch() {
        // Declares 2 payload bytes but carries 1
        let err = ResponseFrame::decode(&[0x00, 0x02, 0x00, 0xFF]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedFrame {
                expected: 5,
                actual: 4
            }
        );

        // Declares 0 payload bytes but carries 1
        let err = ResponseFrame::decode(&[0x00, 0x00, 0x00, 0xFF]).unwrap_err();
        assert!(err.is_malformed_frame());
    }

    #[test]
    fn test_decode_ignores_crc() {
        let a = ResponseFrame::decode(&[0x00, 0x01, 0x00, 0x42]).unwrap();
        let b = ResponseFrame::decode(&[0x00, 0x01, 0xFF, 0x42]).unwrap();

        assert_eq!(a.payload(), b.payload());
        assert_eq!(b.crc(), 0xFF);
    }

    #[test]
    fn test_decode_bytes_shares_buffer() {
        let src = Bytes::from_static(&[0x00, 0x03, 0x11, b'a', b'b', b'c']);
        let response = ResponseFrame::decode_bytes(src).unwrap();

        assert_eq!(response.crc(), 0x11);
        assert_eq!(&response.into_payload()[..], b"abc");

        let err = ResponseFrame::decode_bytes(Bytes::from_static(&[0x00, 0x03])).unwrap_err();
        assert!(err.is_malformed_frame());
    }

    #[test]
    fn test_response_field_constructor() {
        let response = ResponseFrame::new(0x00, &b"ok"[..], 0x00).unwrap();
        assert_eq!(response.payload_length(), 2);

        let bytes = response.encode_to_bytes();
        assert_eq!(&bytes[..], &[0x00, 0x02, 0x00, b'o', b'k']);
        assert_eq!(ResponseFrame::decode(&bytes).unwrap(), response);

        assert!(ResponseFrame::new(0x00, vec![0u8; 256], 0x00).is_err());
    }

    #[test]
    fn test_decode_request() {
        let bytes = [0x01, 0x01, 0x05, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        let request = RequestFrame::decode(&bytes).unwrap();

        assert_eq!(request.target_id(), 0x01);
        assert_eq!(request.op_code(), 0x01);
        assert_eq!(&request.payload()[..], &[0x01, 0x02, 0x03, 0x04, 0x05]);

        let err = RequestFrame::decode(&bytes[..8]).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedFrame {
                expected: 9,
                actual: 8
            }
        );
        assert!(RequestFrame::decode(&[0x01, 0x01, 0x00]).is_err());
    }

    #[test]
    fn test_response_status() {
        let response = ResponseFrame::new(0x01, Bytes::new(), 0).unwrap();
        assert_eq!(
            response.status().unwrap(),
            ResponseCode::UnknownOperationCode
        );

        let response = ResponseFrame::decode(&[0x0A, 0x00, 0x00]).unwrap();
        assert_eq!(
            response.status().unwrap_err(),
            ProtocolError::UnknownResponseCode(0x0A)
        );
    }
}
