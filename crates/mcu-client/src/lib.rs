//! # mcu-client
//!
//! Async request/response client for microcontroller targets on a serial
//! link.
//!
//! The client sits on top of [`mcu_codec::Connection`]: it addresses every
//! request to the configured target, sends it, and waits for the matching
//! response, optionally bounded by a timeout.
//!
//! Opening the serial port is left to the caller; any transport that
//! implements tokio's `AsyncRead + AsyncWrite` works.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mcu_client::{Client, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_connection_string("Port=COM6;Baud=115200;Target=0x01")?;
//!     let port = open_serial(&config.port, config.baud_rate).await?;
//!
//!     let mut client = Client::new(port, config);
//!     let response = client.request(0x01, vec![0x01, 0x02, 0x03, 0x04, 0x05]).await?;
//!     println!("response code {:#04x}", response.response_code());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;

pub use client::Client;
pub use config::Config;
pub use error::{Error, Result};

pub use mcu_codec::CommunicationStatistics;
pub use mcu_protocol::{RequestFrame, ResponseCode, ResponseFrame};
