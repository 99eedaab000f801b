//! Mock MCU peripheral for unit testing.
//!
//! This module provides an in-memory target device that answers request
//! frames over a `tokio::io::duplex` pipe, so client code can be tested
//! without hardware attached.
//!
//! ## Features
//!
//! - Configurable responses per operation code
//! - Address filtering by target id
//! - Chunked response delivery to exercise reassembly
//! - Raw and silent responses for corruption and timeout tests
//! - Recording of every frame in both directions
//!
//! ## Example
//!
//! ```rust,ignore
//! use mcu_testing::mock_device::{MockDevice, MockResponse};
//!
//! #[tokio::test]
//! async fn test_ping() {
//!     let device = MockDevice::builder()
//!         .with_response(0x01, MockResponse::ok(vec![0xFF, 0xEE]))
//!         .build();
//!
//!     let transport = device.connect().unwrap();
//!     // Hand the transport to a client...
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use futures_util::StreamExt;
use mcu_codec::{CodecError, FrameLayout, FrameStream, McuCodec};
use mcu_protocol::{RequestFrame, ResponseCode, ResponseFrame};
use thiserror::Error;
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::sync::{Mutex, broadcast};

use crate::recorder::FrameRecorder;

/// Error type for mock device operations.
#[derive(Debug, Error)]
pub enum MockDeviceError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Device already stopped.
    #[error("Device already stopped")]
    Stopped,
}

impl From<CodecError> for MockDeviceError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Io(e) => Self::Io(e),
            other => Self::Protocol(other.to_string()),
        }
    }
}

/// Result type for mock device operations.
pub type Result<T> = std::result::Result<T, MockDeviceError>;

/// Mock response configuration.
#[derive(Clone)]
pub enum MockResponse {
    /// Answer with a well-formed response frame.
    Reply(ResponseFrame),

    /// Write these bytes verbatim, framed or not.
    Raw(Bytes),

    /// Send nothing.
    Silent,

    /// Compute the response from the request.
    Custom(Arc<dyn Fn(&RequestFrame) -> MockResponse + Send + Sync>),
}

impl fmt::Debug for MockResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reply(frame) => f.debug_tuple("Reply").field(frame).finish(),
            Self::Raw(data) => f.debug_tuple("Raw").field(&data.len()).finish(),
            Self::Silent => f.write_str("Silent"),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<fn>").finish(),
        }
    }
}

impl MockResponse {
    /// A successful response carrying `payload`.
    ///
    /// Payloads beyond the frame limit are truncated.
    pub fn ok(payload: impl Into<Bytes>) -> Self {
        Self::reply(ResponseCode::Ok.as_u8(), payload)
    }

    /// An empty response with the given status.
    pub fn status(code: ResponseCode) -> Self {
        Self::reply(code.as_u8(), Bytes::new())
    }

    /// A response with an arbitrary code and payload.
    ///
    /// Payloads beyond the frame limit are truncated.
    pub fn reply(code: u8, payload: impl Into<Bytes>) -> Self {
        let mut payload = payload.into();
        payload.truncate(mcu_protocol::MAX_PAYLOAD_SIZE);
        match ResponseFrame::new(code, payload, 0x00) {
            Ok(frame) => Self::Reply(frame),
            Err(_) => Self::Silent,
        }
    }

    /// Raw bytes written as-is.
    pub fn raw(data: impl Into<Bytes>) -> Self {
        Self::Raw(data.into())
    }

    /// Answer every request with its own payload.
    pub fn echo() -> Self {
        Self::Custom(Arc::new(|request: &RequestFrame| {
            MockResponse::ok(request.payload().clone())
        }))
    }

    /// Resolve into the bytes to write, if any.
    fn resolve(&self, request: &RequestFrame) -> Option<Bytes> {
        let mut response = self.clone();
        loop {
            match response {
                Self::Reply(frame) => return Some(frame.encode_to_bytes()),
                Self::Raw(data) => return Some(data),
                Self::Silent => return None,
                Self::Custom(handler) => response = handler(request),
            }
        }
    }
}

/// Configuration for the mock device.
#[derive(Debug)]
pub struct MockDeviceConfig {
    /// Responses keyed by operation code.
    responses: HashMap<u8, MockResponse>,
    /// Response for operation codes without an entry.
    default_response: MockResponse,
    /// Only answer requests addressed to this target.
    target_id: Option<u8>,
    /// Deliver responses in pieces of this many bytes.
    chunk_size: Option<usize>,
    /// Capacity of the in-memory pipe.
    buffer_size: usize,
}

/// Builder for [`MockDevice`].
#[derive(Debug)]
pub struct MockDeviceBuilder {
    config: MockDeviceConfig,
}

impl MockDeviceBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: MockDeviceConfig {
                responses: HashMap::new(),
                default_response: MockResponse::status(ResponseCode::UnknownOperationCode),
                target_id: None,
                chunk_size: None,
                buffer_size: 1024,
            },
        }
    }

    /// Add a response for a specific operation code.
    pub fn with_response(mut self, op_code: u8, response: MockResponse) -> Self {
        self.config.responses.insert(op_code, response);
        self
    }

    /// Set the response for unmatched operation codes.
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.config.default_response = response;
        self
    }

    /// Ignore requests addressed to any other target.
    pub fn with_target_id(mut self, target_id: u8) -> Self {
        self.config.target_id = Some(target_id);
        self
    }

    /// Write responses in pieces of `size` bytes, flushing between pieces.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = Some(size.max(1));
        self
    }

    /// Set the capacity of the in-memory pipe.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size.max(1);
        self
    }

    /// Build the mock device.
    pub fn build(self) -> MockDevice {
        MockDevice::new(self.config)
    }
}

impl Default for MockDeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A mock MCU target for testing.
///
/// Each call to [`MockDevice::connect`] opens a new in-memory link and
/// spawns a task that answers requests on it until the host side closes
/// or the device is stopped.
pub struct MockDevice {
    config: Arc<MockDeviceConfig>,
    shutdown_tx: broadcast::Sender<()>,
    stopped: Arc<AtomicBool>,
    connection_count: Arc<Mutex<usize>>,
    recorder: Arc<Mutex<FrameRecorder>>,
}

impl MockDevice {
    /// Create a new builder for the mock device.
    pub fn builder() -> MockDeviceBuilder {
        MockDeviceBuilder::new()
    }

    /// Create a device from a configuration.
    pub fn new(config: MockDeviceConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config: Arc::new(config),
            shutdown_tx,
            stopped: Arc::new(AtomicBool::new(false)),
            connection_count: Arc::new(Mutex::new(0)),
            recorder: Arc::new(Mutex::new(FrameRecorder::new())),
        }
    }

    /// Open a new link to the device and return the host end.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(&self) -> Result<DuplexStream> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(MockDeviceError::Stopped);
        }

        let (host, device) = tokio::io::duplex(self.config.buffer_size);
        let config = self.config.clone();
        let count = self.connection_count.clone();
        let recorder = self.recorder.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            {
                let mut c = count.lock().await;
                *c += 1;
            }
            if let Err(e) = handle_connection(device, config, recorder, shutdown_rx).await {
                tracing::debug!("mock device link error: {}", e);
            }
            {
                let mut c = count.lock().await;
                *c = c.saturating_sub(1);
            }
        });

        Ok(host)
    }

    /// Get the number of open links.
    pub async fn connection_count(&self) -> usize {
        *self.connection_count.lock().await
    }

    /// Get a snapshot of every frame seen so far.
    pub async fn recorded(&self) -> FrameRecorder {
        self.recorder.lock().await.clone()
    }

    /// Stop the device; open links are closed.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    /// Check if the device has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl fmt::Debug for MockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDevice")
            .field("config", &self.config)
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Answer requests on one link.
async fn handle_connection(
    stream: DuplexStream,
    config: Arc<MockDeviceConfig>,
    recorder: Arc<Mutex<FrameRecorder>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let codec = McuCodec::new().with_layout(FrameLayout::REQUEST);
    let mut framed = FrameStream::with_codec(stream, codec);

    loop {
        let frame = tokio::select! {
            frame = framed.next() => frame,
            _ = shutdown_rx.recv() => break,
        };

        // Host closed the link
        let Some(frame) = frame else { break };
        let frame = frame?;
        recorder.lock().await.record(false, frame.clone());

        let request = match RequestFrame::decode(&frame) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "mock device dropped malformed request");
                continue;
            }
        };

        if config
            .target_id
            .is_some_and(|target| target != request.target_id())
        {
            tracing::trace!(
                target_id = request.target_id(),
                "mock device ignoring request for another target"
            );
            continue;
        }

        let response = config
            .responses
            .get(&request.op_code())
            .unwrap_or(&config.default_response);

        let Some(bytes) = response.resolve(&request) else {
            continue;
        };

        match config.chunk_size {
            Some(size) => {
                let io = framed.get_mut();
                for chunk in bytes.chunks(size) {
                    io.write_all(chunk).await?;
                    io.flush().await?;
                    tokio::task::yield_now().await;
                }
            }
            None => {
                framed.get_mut().write_all(&bytes).await?;
                framed.get_mut().flush().await?;
            }
        }

        recorder.lock().await.record(true, bytes);
    }

    Ok(())
}
