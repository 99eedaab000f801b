//! # mcu-codec
//!
//! Framing layer for the MCU serial protocol.
//!
//! This crate turns an unaligned stream of serial bytes into complete
//! response frames and writes request frames back out, for both async
//! transports (tokio) and simple polling transports.
//!
//! ## Features
//!
//! - Byte-at-a-time frame reassembly with no failure mode
//! - Lazy, restartable chunk feeding
//! - Integration with tokio-util's codec framework
//! - Polling [`Session`] for non-blocking byte sources
//!
//! ## Architecture
//!
//! ```text
//! serial bytes → FrameReassembler (framing) → ResponseFrame::decode → caller
//! ```
//!
//! Framing never fails; decoding may. A frame that fails to decode is
//! reported on its own and the stream continues with the next frame.
//!
//! ```rust
//! use mcu_codec::FrameReassembler;
//! use mcu_protocol::ResponseFrame;
//!
//! let mut reassembler = FrameReassembler::new();
//! let mut responses = Vec::new();
//! for chunk in [&[0x0A, 0x02][..], &[0x00, 0xFF, 0xEE, 0x05][..], &[0x00, 0x00][..]] {
//!     for frame in reassembler.feed_chunk(chunk) {
//!         responses.push(ResponseFrame::decode(&frame)?);
//!     }
//! }
//! assert_eq!(responses.len(), 2);
//! # Ok::<(), mcu_protocol::ProtocolError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod codec;
pub mod connection;
pub mod error;
pub mod framed;
pub mod reassembler;
pub mod stats;
pub mod transport;

pub use codec::McuCodec;
pub use connection::Connection;
pub use error::CodecError;
pub use framed::{FrameReader, FrameStream, FrameWriter};
pub use reassembler::{FrameLayout, FrameReassembler, Frames, ReassemblerState};
pub use stats::CommunicationStatistics;
pub use transport::{Session, Transport};
