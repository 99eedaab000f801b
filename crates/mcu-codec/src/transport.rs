//! Polling session over a synchronous transport.
//!
//! Some serial drivers expose a non-blocking "is a byte pending?" poll rather
//! than an async reader. [`Session`] drives the reassembler from such a
//! transport: it drains whatever bytes are pending and hands back the
//! frames they complete. Partial frames stay buffered until a later poll
//! delivers the rest.

use std::io;

use bytes::Bytes;
use mcu_protocol::{RequestFrame, ResponseFrame};

use crate::error::CodecError;
use crate::reassembler::FrameReassembler;
use crate::stats::CommunicationStatistics;

/// A byte-oriented transport with non-blocking reads.
pub trait Transport {
    /// Write every byte, blocking until the transport has accepted them.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Return the next pending byte, or `None` if none is available now.
    fn poll_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).poll_byte()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).poll_byte()
    }
}

/// A request/response session over a polling [`Transport`].
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    reassembler: FrameReassembler,
    stats: CommunicationStatistics,
}

impl<T: Transport> Session<T> {
    /// Create a session over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            reassembler: FrameReassembler::new(),
            stats: CommunicationStatistics::new(),
        }
    }

    /// Encode and write a request.
    pub fn send(&mut self, request: &RequestFrame) -> Result<(), CodecError> {
        let bytes = request.encode_to_bytes();
        self.transport.write_all(&bytes)?;
        self.stats.record_sent();

        tracing::trace!(
            target_id = request.target_id(),
            op_code = request.op_code(),
            length = bytes.len(),
            "sent request"
        );

        Ok(())
    }

    /// Pull pending bytes until one frame completes.
    ///
    /// Returns `Ok(None)` once no byte is pending; bytes of an unfinished
    /// frame remain buffered for the next call.
    pub fn poll_frame(&mut self) -> Result<Option<Bytes>, CodecError> {
        while let Some(byte) = self.transport.poll_byte()? {
            if let Some(frame) = self.reassembler.feed(byte) {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Pull pending bytes until one response completes, and decode it.
    ///
    /// A decode failure is returned as [`CodecError::Protocol`]; polling
    /// again continues with the following bytes.
    pub fn poll_response(&mut self) -> Result<Option<ResponseFrame>, CodecError> {
        match self.poll_frame()? {
            Some(frame) => self.decode(frame).map(Some),
            None => Ok(None),
        }
    }

    /// Drain every pending byte and decode each frame it completes.
    ///
    /// Each frame is decoded independently. A transport error stops the
    /// drain and is returned as the last item.
    pub fn drain(&mut self) -> Vec<Result<ResponseFrame, CodecError>> {
        let mut responses = Vec::new();
        loop {
            match self.poll_frame() {
                Ok(Some(frame)) => responses.push(self.decode(frame)),
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(error = %e, "transport failed while draining");
                    responses.push(Err(e));
                    break;
                }
            }
        }
        responses
    }

    fn decode(&mut self, frame: Bytes) -> Result<ResponseFrame, CodecError> {
        match ResponseFrame::decode_bytes(frame) {
            Ok(response) => {
                self.stats.record_valid();
                Ok(response)
            }
            Err(e) => {
                self.stats.record_corrupted();
                tracing::warn!(error = %e, "discarding malformed response frame");
                Err(e.into())
            }
        }
    }

    /// Get a reference to the reassembler.
    #[must_use]
    pub fn reassembler(&self) -> &FrameReassembler {
        &self.reassembler
    }

    /// Traffic counters for this session.
    #[must_use]
    pub fn statistics(&self) -> &CommunicationStatistics {
        &self.stats
    }

    /// Get a reference to the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return the transport.
    ///
    /// Any partial frame is abandoned.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
