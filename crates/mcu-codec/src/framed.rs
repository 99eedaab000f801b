//! Framed frame streams for async I/O.
//!
//! This module provides both combined and split stream types:
//! - `FrameStream<T>` - Combined read/write stream for bidirectional I/O
//! - `FrameReader<T>` - Read-only stream yielding complete frame buffers
//! - `FrameWriter<T>` - Write-only sink accepting request or response frames
//!
//! Every stream yields raw frame buffers. Decoding them is a separate step,
//! so a frame that fails to decode does not end the stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::Sink;
use pin_project_lite::pin_project;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Encoder, Framed, FramedRead, FramedWrite};

use crate::codec::McuCodec;
use crate::error::CodecError;

pin_project! {
    /// A framed stream over an async serial transport.
    ///
    /// This wraps a tokio-util `Framed` codec and provides a higher-level
    /// interface for sending frames and receiving frame buffers.
    pub struct FrameStream<T> {
        #[pin]
        inner: Framed<T, McuCodec>,
    }
}

impl<T> FrameStream<T>
where
    T: AsyncRead + AsyncWrite,
{
    /// Create a new frame stream over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            inner: Framed::new(transport, McuCodec::new()),
        }
    }

    /// Create a new frame stream with a custom codec.
    pub fn with_codec(transport: T, codec: McuCodec) -> Self {
        Self {
            inner: Framed::new(transport, codec),
        }
    }

    /// Get a reference to the underlying transport.
    pub fn get_ref(&self) -> &T {
        self.inner.get_ref()
    }

    /// Get a mutable reference to the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Get a reference to the codec.
    pub fn codec(&self) -> &McuCodec {
        self.inner.codec()
    }

    /// Get a mutable reference to the codec.
    pub fn codec_mut(&mut self) -> &mut McuCodec {
        self.inner.codec_mut()
    }

    /// Consume the stream and return the underlying transport.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    /// Get a reference to the read buffer.
    pub fn read_buffer(&self) -> &BytesMut {
        self.inner.read_buffer()
    }
}

impl<T> Stream for FrameStream<T>
where
    T: AsyncRead + Unpin,
{
    type Item = Result<Bytes, CodecError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}

impl<T, I> Sink<I> for FrameStream<T>
where
    T: AsyncWrite + Unpin,
    McuCodec: Encoder<I, Error = CodecError>,
{
    type Error = CodecError;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.project().inner.poll_ready(cx)
    }

    fn start_send(self: Pin<&mut Self>, item: I) -> Result<(), Self::Error> {
        self.project().inner.start_send(item)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.project().inner.poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.project().inner.poll_close(cx)
    }
}

impl<T> std::fmt::Debug for FrameStream<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStream")
            .field("transport", self.inner.get_ref())
            .finish()
    }
}

// =============================================================================
// Split stream types
// =============================================================================

pin_project! {
    /// A read-only stream of complete frame buffers.
    ///
    /// This is the read half of a split [`Connection`](crate::Connection).
    pub struct FrameReader<T> {
        #[pin]
        inner: FramedRead<T, McuCodec>,
    }
}

impl<T> FrameReader<T>
where
    T: AsyncRead,
{
    /// Create a new frame reader over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            inner: FramedRead::new(transport, McuCodec::new()),
        }
    }

    /// Create a new frame reader with a custom codec.
    pub fn with_codec(transport: T, codec: McuCodec) -> Self {
        Self {
            inner: FramedRead::new(transport, codec),
        }
    }

    /// Get a reference to the underlying transport.
    pub fn get_ref(&self) -> &T {
        self.inner.get_ref()
    }

    /// Get a mutable reference to the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Get a reference to the codec.
    pub fn codec(&self) -> &McuCodec {
        self.inner.decoder()
    }

    /// Get a mutable reference to the codec.
    pub fn codec_mut(&mut self) -> &mut McuCodec {
        self.inner.decoder_mut()
    }

    /// Get a reference to the read buffer.
    pub fn read_buffer(&self) -> &BytesMut {
        self.inner.read_buffer()
    }
}

impl<T> Stream for FrameReader<T>
where
    T: AsyncRead + Unpin,
{
    type Item = Result<Bytes, CodecError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}

impl<T> std::fmt::Debug for FrameReader<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("transport", self.inner.get_ref())
            .finish()
    }
}

pin_project! {
    /// A write-only sink for frames.
    ///
    /// This is the write half of a split [`Connection`](crate::Connection).
    pub struct FrameWriter<T> {
        #[pin]
        inner: FramedWrite<T, McuCodec>,
    }
}

impl<T> FrameWriter<T>
where
    T: AsyncWrite,
{
    /// Create a new frame writer over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            inner: FramedWrite::new(transport, McuCodec::new()),
        }
    }

    /// Get a reference to the underlying transport.
    pub fn get_ref(&self) -> &T {
        self.inner.get_ref()
    }

    /// Get a mutable reference to the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }
}

impl<T, I> Sink<I> for FrameWriter<T>
where
    T: AsyncWrite + Unpin,
    McuCodec: Encoder<I, Error = CodecError>,
{
    type Error = CodecError;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.project().inner.poll_ready(cx)
    }

    fn start_send(self: Pin<&mut Self>, item: I) -> Result<(), Self::Error> {
        self.project().inner.start_send(item)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.project().inner.poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.project().inner.poll_close(cx)
    }
}

impl<T> std::fmt::Debug for FrameWriter<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter")
            .field("transport", self.inner.get_ref())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use mcu_protocol::{RequestFrame, ResponseFrame};

    use crate::reassembler::FrameLayout;

    #[tokio::test]
    async fn test_reader_across_split_reads() {
        let mock = tokio_test::io::Builder::new()
            .read(&[0x0A, 0x02])
            .read(&[0x00, 0xFF])
            .read(&[0xEE, 0x05, 0x00, 0x00])
            .build();

        let mut reader = FrameReader::new(mock);

        let first = reader.next().await.unwrap().unwrap();
        assert_eq!(&first[..], &[0x0A, 0x02, 0x00, 0xFF, 0xEE]);

        let second = reader.next().await.unwrap().unwrap();
        assert_eq!(&second[..], &[0x05, 0x00, 0x00]);

        assert!(reader.next().await.is_none());
    }

    #[tokio::test]
    async fn test_writer_sends_request() {
        let mock = tokio_test::io::Builder::new()
            .write(&[0x01, 0x01, 0x05, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05])
            .build();

        let mut writer = FrameWriter::new(mock);
        let request = RequestFrame::new(0x01, 0x01, vec![0x01, 0x02, 0x03, 0x04, 0x05]).unwrap();
        writer.send(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_stream_both_directions() {
        let (host, device) = tokio::io::duplex(64);

        let mut host = FrameStream::new(host);
        let mut device =
            FrameStream::with_codec(device, McuCodec::new().with_layout(FrameLayout::REQUEST));

        let request = RequestFrame::new(0x01, 0x02, &b"hi"[..]).unwrap();
        host.send(request.clone()).await.unwrap();

        let received = device.next().await.unwrap().unwrap();
        assert_eq!(RequestFrame::decode(&received).unwrap(), request);

        let response = ResponseFrame::new(0x00, &b"ok"[..], 0x00).unwrap();
        device.send(response.clone()).await.unwrap();

        let received = host.next().await.unwrap().unwrap();
        assert_eq!(ResponseFrame::decode(&received).unwrap(), response);
    }
}
