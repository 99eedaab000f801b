//! Async connection to a target over a serial transport.
//!
//! The transport is split into read and write halves so that the two
//! directions can also be driven independently via [`Connection::into_split`].

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use mcu_protocol::{RequestFrame, ResponseFrame};
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};

use crate::error::CodecError;
use crate::framed::{FrameReader, FrameWriter};
use crate::stats::CommunicationStatistics;

/// A request/response connection to a target.
///
/// Response bytes are reassembled continuously; each complete frame is
/// decoded on its own, so a frame that fails to decode is reported without
/// disturbing the frames that follow it.
///
/// # Example
///
/// ```rust,ignore
/// use mcu_codec::Connection;
/// use mcu_protocol::RequestFrame;
///
/// let mut conn = Connection::new(serial_port);
/// let request = RequestFrame::new(0x01, 0x01, vec![0x01, 0x02])?;
/// let response = conn.request(request).await?;
/// println!("code {:#04x}", response.response_code());
/// ```
pub struct Connection<T>
where
    T: AsyncRead + AsyncWrite,
{
    /// Read half wrapped in a frame reader.
    reader: FrameReader<ReadHalf<T>>,
    /// Write half wrapped in a frame writer.
    writer: FrameWriter<WriteHalf<T>>,
    /// Traffic counters.
    stats: CommunicationStatistics,
}

impl<T> Connection<T>
where
    T: AsyncRead + AsyncWrite,
{
    /// Create a new connection from a transport.
    ///
    /// The transport is immediately split into read and write halves.
    pub fn new(transport: T) -> Self {
        let (read_half, write_half) = tokio::io::split(transport);

        tracing::debug!("opened connection");

        Self {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(write_half),
            stats: CommunicationStatistics::new(),
        }
    }

    /// Send a request and flush it to the transport.
    pub async fn send_request(&mut self, request: RequestFrame) -> Result<(), CodecError> {
        self.writer.send(request).await?;
        self.stats.record_sent();
        Ok(())
    }

    /// Read the next complete frame buffer without decoding it.
    ///
    /// Returns `Ok(None)` when the transport closes between frames and
    /// [`CodecError::ConnectionClosed`] when it closes mid-frame.
    pub async fn read_frame(&mut self) -> Result<Option<Bytes>, CodecError> {
        match self.reader.next().await {
            Some(result) => result.map(Some),
            None => {
                if self.reader.codec().reassembler().has_partial() {
                    return Err(CodecError::ConnectionClosed);
                }
                Ok(None)
            }
        }
    }

    /// Read and decode the next response.
    ///
    /// A decode failure is returned as [`CodecError::Protocol`]; the
    /// connection remains usable and the next call reads the next frame.
    pub async fn read_response(&mut self) -> Result<Option<ResponseFrame>, CodecError> {
        let Some(frame) = self.read_frame().await? else {
            return Ok(None);
        };

        match ResponseFrame::decode_bytes(frame) {
            Ok(response) => {
                self.stats.record_valid();
                tracing::trace!(
                    response_code = response.response_code(),
                    payload_length = response.payload_length(),
                    "received response"
                );
                Ok(Some(response))
            }
            Err(e) => {
                self.stats.record_corrupted();
                tracing::warn!(error = %e, "discarding malformed response frame");
                Err(e.into())
            }
        }
    }

    /// Send a request and wait for the next response.
    ///
    /// There is no timeout here; bound the call with `tokio::time::timeout`
    /// if the link may go silent.
    pub async fn request(&mut self, request: RequestFrame) -> Result<ResponseFrame, CodecError> {
        self.send_request(request).await?;
        self.read_response()
            .await?
            .ok_or(CodecError::ConnectionClosed)
    }

    /// Record that the caller gave up waiting for a response.
    pub fn record_timeout(&mut self) {
        self.stats.record_timeout();
    }

    /// Traffic counters for this connection.
    #[must_use]
    pub fn statistics(&self) -> &CommunicationStatistics {
        &self.stats
    }

    /// Check if a partial response frame is buffered.
    #[must_use]
    pub fn has_partial_frame(&self) -> bool {
        self.reader.codec().reassembler().has_partial()
    }

    /// Split into independent read and write halves.
    pub fn into_split(self) -> (FrameReader<ReadHalf<T>>, FrameWriter<WriteHalf<T>>) {
        (self.reader, self.writer)
    }
}

impl<T> std::fmt::Debug for Connection<T>
where
    T: AsyncRead + AsyncWrite,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("has_partial_frame", &self.has_partial_frame())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
