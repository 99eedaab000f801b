//! Frame codec for tokio-util framing.

use bytes::{Buf, Bytes, BytesMut};
use mcu_protocol::{RequestFrame, ResponseFrame};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::CodecError;
use crate::reassembler::{FrameLayout, FrameReassembler};

/// Codec for the serial protocol.
///
/// Decoding yields complete frame buffers exactly as the
/// [`FrameReassembler`] emits them; interpretation is left to the caller so
/// that a malformed frame never terminates the stream. Encoding writes
/// request or response frames in wire order.
#[derive(Debug)]
pub struct McuCodec {
    reassembler: FrameReassembler,
}

impl McuCodec {
    /// Create a codec that reassembles response frames.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reassembler: FrameReassembler::new(),
        }
    }

    /// Reassemble frames of a different layout.
    #[must_use]
    pub fn with_layout(mut self, layout: FrameLayout) -> Self {
        self.reassembler = self.reassembler.with_layout(layout);
        self
    }

    /// Get a reference to the reassembler.
    #[must_use]
    pub fn reassembler(&self) -> &FrameReassembler {
        &self.reassembler
    }

    /// Discard any partially received frame.
    pub fn reset(&mut self) {
        self.reassembler.clear();
    }
}

impl Default for McuCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for McuCodec {
    type Item = Bytes;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Bytes move into the reassembler one at a time, so a frame that
        // spans reads is carried in the reassembler rather than in `src`.
        while src.has_remaining() {
            if let Some(frame) = self.reassembler.feed(src.get_u8()) {
                tracing::trace!(
                    length = frame.len(),
                    buffered = src.len(),
                    "decoded frame"
                );
                return Ok(Some(frame));
            }
        }

        Ok(None)
    }
}

impl Encoder<RequestFrame> for McuCodec {
    type Error = CodecError;

    fn encode(&mut self, item: RequestFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.encoded_len());
        item.encode(dst);

        tracing::trace!(
            target_id = item.target_id(),
            op_code = item.op_code(),
            payload_length = item.payload_length(),
            "encoded request frame"
        );

        Ok(())
    }
}

impl Encoder<ResponseFrame> for McuCodec {
    type Error = CodecError;

    fn encode(&mut self, item: ResponseFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.encoded_len());
        item.encode(dst);

        tracing::trace!(
            response_code = item.response_code(),
            payload_length = item.payload_length(),
            "encoded response frame"
        );

        Ok(())
    }
}
