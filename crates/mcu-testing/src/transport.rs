//! Scripted synchronous transport.

use std::collections::VecDeque;
use std::io;

use mcu_codec::Transport;

/// A [`Transport`] fed from a script of pending bytes and errors.
///
/// Bytes queued with [`push_bytes`](Self::push_bytes) are handed out one at
/// a time by `poll_byte`; an empty queue reads as "nothing pending".
/// Everything written is captured for inspection.
#[derive(Debug, Default)]
pub struct MockTransport {
    pending: VecDeque<io::Result<u8>>,
    written: Vec<u8>,
    write_error: Option<io::ErrorKind>,
}

impl MockTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with bytes already pending.
    pub fn with_pending(bytes: &[u8]) -> Self {
        let mut transport = Self::new();
        transport.push_bytes(bytes);
        transport
    }

    /// Queue bytes for reading.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied().map(Ok));
    }

    /// Queue a read error after the bytes already pending.
    pub fn push_error(&mut self, kind: io::ErrorKind) {
        self.pending.push_back(Err(kind.into()));
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&mut self, kind: io::ErrorKind) {
        self.write_error = Some(kind);
    }

    /// Number of queued bytes and errors.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Take the bytes written so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Some(kind) = self.write_error {
            return Err(kind.into());
        }
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn poll_byte(&mut self) -> io::Result<Option<u8>> {
        self.pending.pop_front().transpose()
    }
}
