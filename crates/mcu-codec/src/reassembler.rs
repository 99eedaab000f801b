//! Frame reassembly from an unaligned byte stream.
//!
//! Bytes arrive from the serial link one at a time or in chunks of any size,
//! with no guarantee that a read starts on a frame boundary. The
//! [`FrameReassembler`] accumulates them until the length byte is known and
//! then until the frame is complete, emitting each frame exactly once.
//!
//! Reassembly never fails: every byte value is accepted in every position.
//! A corrupt length byte yields a frame of the wrong size, which is reported
//! when that frame is decoded, while reassembly carries on with the next
//! byte.

use bytes::{BufMut, Bytes, BytesMut};
use mcu_protocol::{
    MAX_RESPONSE_FRAME_SIZE, REQUEST_HEADER_SIZE, REQUEST_LENGTH_OFFSET, RESPONSE_HEADER_SIZE,
    RESPONSE_LENGTH_OFFSET,
};

/// Position of the length byte and size of the header for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameLayout {
    length_offset: usize,
    header_size: usize,
}

impl FrameLayout {
    /// Responses sent by the target: `payload_length + 3` bytes per frame.
    pub const RESPONSE: Self = Self {
        length_offset: RESPONSE_LENGTH_OFFSET,
        header_size: RESPONSE_HEADER_SIZE,
    };

    /// Requests sent to the target: `payload_length + 4` bytes per frame.
    pub const REQUEST: Self = Self {
        length_offset: REQUEST_LENGTH_OFFSET,
        header_size: REQUEST_HEADER_SIZE,
    };

    /// Offset of the payload length byte.
    #[must_use]
    pub const fn length_offset(&self) -> usize {
        self.length_offset
    }

    /// Number of header bytes not counted by the length byte.
    #[must_use]
    pub const fn header_size(&self) -> usize {
        self.header_size
    }

    /// Bytes needed before the total frame length is known.
    #[must_use]
    pub const fn prefix_len(&self) -> usize {
        self.length_offset + 1
    }

    /// Total frame length for a given length byte.
    #[must_use]
    pub const fn frame_len(&self, payload_length: u8) -> usize {
        self.header_size + payload_length as usize
    }
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::RESPONSE
    }
}

/// Observable state of a [`FrameReassembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassemblerState {
    /// The length byte has not arrived yet.
    AwaitingHeader,
    /// The total length is known; waiting for the rest of the frame.
    AwaitingBody {
        /// Total length of the frame being assembled.
        expected_len: usize,
    },
}

/// Reassembles complete frames from a byte stream.
///
/// State is limited to the bytes of the current frame and, once known, its
/// total length. Both are cleared the moment a frame is emitted, so no state
/// carries over between frames.
#[derive(Debug)]
pub struct FrameReassembler {
    /// Bytes received so far for the current frame.
    buffer: BytesMut,
    /// Total length of the current frame, once the length byte is in.
    expected_len: Option<usize>,
    /// Where the length byte sits.
    layout: FrameLayout,
}

impl FrameReassembler {
    /// Create a reassembler for response frames.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_RESPONSE_FRAME_SIZE)
    }

    /// Create a reassembler with pre-allocated buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            expected_len: None,
            layout: FrameLayout::RESPONSE,
        }
    }

    /// Use a different frame layout.
    #[must_use]
    pub fn with_layout(mut self, layout: FrameLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Frame layout in use.
    #[must_use]
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Feed one byte.
    ///
    /// Returns the complete frame if this byte finishes one. Never blocks
    /// and never fails.
    pub fn feed(&mut self, byte: u8) -> Option<Bytes> {
        self.buffer.put_u8(byte);

        if self.expected_len.is_none() && self.buffer.len() == self.layout.prefix_len() {
            self.expected_len = Some(self.layout.frame_len(byte));
        }

        match self.expected_len {
            Some(expected_len) if self.buffer.len() == expected_len => {
                self.expected_len = None;
                let frame = self.buffer.split().freeze();

                tracing::trace!(frame_len = frame.len(), "reassembled frame");

                Some(frame)
            }
            _ => None,
        }
    }

    /// Feed a chunk of bytes, yielding complete frames lazily.
    ///
    /// Bytes are consumed only as the returned iterator advances. If it is
    /// dropped early, the unconsumed tail is available from
    /// [`Frames::remainder`] and can be fed later without loss.
    pub fn feed_chunk<'r, 'c>(&'r mut self, chunk: &'c [u8]) -> Frames<'r, 'c> {
        Frames {
            reassembler: self,
            remaining: chunk,
        }
    }

    /// Feed a chunk of bytes and collect every frame it completes.
    pub fn feed_all(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.feed_chunk(chunk).collect()
    }

    /// Current state of the automaton.
    #[must_use]
    pub fn state(&self) -> ReassemblerState {
        match self.expected_len {
            Some(expected_len) => ReassemblerState::AwaitingBody { expected_len },
            None => ReassemblerState::AwaitingHeader,
        }
    }

    /// Check if a partial frame is buffered.
    #[must_use]
    pub fn has_partial(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Number of bytes buffered for the current frame.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Discard any partial frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.expected_len = None;
    }
}

impl Default for FrameReassembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy sequence of frames produced from one chunk.
///
/// Created by [`FrameReassembler::feed_chunk`].
#[derive(Debug)]
#[must_use = "bytes are only consumed as the iterator advances"]
pub struct Frames<'r, 'c> {
    reassembler: &'r mut FrameReassembler,
    remaining: &'c [u8],
}

impl<'c> Frames<'_, 'c> {
    /// Bytes of the chunk not yet consumed.
    #[must_use]
    pub fn remainder(&self) -> &'c [u8] {
        self.remaining
    }
}

impl Iterator for Frames<'_, '_> {
    type Item = Bytes;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((&byte, rest)) = self.remaining.split_first() {
            self.remaining = rest;
            if let Some(frame) = self.reassembler.feed(byte) {
                return Some(frame);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.len()))
    }
}
