//! # mcu-protocol
//!
//! Pure implementation of the length-delimited request/response protocol
//! spoken with a microcontroller target over a serial link.
//!
//! This crate provides `no_std` compatible frame structures and their wire
//! encoding. It knows nothing about transports or framing of a live byte
//! stream; see `mcu-codec` for reassembly.
//!
//! ## Features
//!
//! - `std` (default): Enable standard library support
//! - `alloc`: Enable allocation without full std (requires `alloc` crate)
//!
//! ## Example
//!
//! ```rust
//! use mcu_protocol::{RequestFrame, ResponseFrame};
//!
//! let request = RequestFrame::new(0x01, 0x01, vec![0x01, 0x02, 0x03, 0x04, 0x05])?;
//! assert_eq!(
//!     &request.encode_to_bytes()[..],
//!     &[0x01, 0x01, 0x05, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05]
//! );
//!
//! let response = ResponseFrame::decode(&[0x0A, 0x02, 0x00, 0xFF, 0xEE])?;
//! assert_eq!(response.response_code(), 0x0A);
//! assert_eq!(&response.payload()[..], &[0xFF, 0xEE]);
//! # Ok::<(), mcu_protocol::ProtocolError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod frame;
pub mod response_code;

pub use error::ProtocolError;
pub use frame::{
    MAX_PAYLOAD_SIZE, MAX_REQUEST_FRAME_SIZE, MAX_RESPONSE_FRAME_SIZE, REQUEST_HEADER_SIZE,
    REQUEST_LENGTH_OFFSET, RESPONSE_HEADER_SIZE, RESPONSE_LENGTH_OFFSET, RequestFrame,
    ResponseFrame, decode_response, encode_request,
};
pub use response_code::ResponseCode;
