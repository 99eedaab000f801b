//! # mcu-testing
//!
//! Test infrastructure for the MCU serial link.
//!
//! This crate provides utilities for testing host code without a target
//! attached: an in-memory mock device, a scripted polling transport, and
//! frame recording.
//!
//! ## Features
//!
//! - Mock MCU peripheral over `tokio::io::duplex` (no hardware required)
//! - Scripted [`MockTransport`] for polling sessions
//! - Frame recording and replay for regression tests
//! - Canonical wire fixtures
//!
//! ## Mock Device Example
//!
//! ```rust,ignore
//! use mcu_client::{Client, Config};
//! use mcu_testing::mock_device::{MockDevice, MockResponse};
//!
//! #[tokio::test]
//! async fn test_with_mock_device() {
//!     let device = MockDevice::builder()
//!         .with_response(0x01, MockResponse::ok(vec![0xFF, 0xEE]))
//!         .build();
//!
//!     let mut client = Client::new(device.connect().unwrap(), Config::default());
//!     let response = client.request(0x01, vec![0x01]).await.unwrap();
//!     assert_eq!(&response.payload()[..], &[0xFF, 0xEE]);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod fixtures;
pub mod mock_device;
pub mod recorder;
pub mod transport;

pub use mock_device::{
    MockDevice, MockDeviceBuilder, MockDeviceConfig, MockDeviceError, MockResponse,
};
pub use recorder::{FrameRecorder, RecordedFrame};
pub use transport::MockTransport;
