//! Mock Device Fidelity Tests
//!
//! These tests drive the real client stack against the in-memory mock
//! device and check that every frame crosses the link intact.
//!
//! ```bash
//! cargo test -p mcu-testing --test mock_fidelity
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use bytes::Bytes;
use mcu_client::{Client, Config, Error, ResponseCode};
use mcu_codec::Session;
use mcu_protocol::{RequestFrame, ResponseFrame};
use mcu_testing::fixtures::{EMPTY_RESPONSE, PING_REQUEST, SAMPLE_RESPONSE, response_stream, split_by};
use mcu_testing::{MockDevice, MockResponse, MockTransport};

// =============================================================================
// Client Round Trips
// =============================================================================

#[tokio::test]
async fn test_client_round_trip() {
    let device = MockDevice::builder()
        .with_response(0x01, MockResponse::raw(Bytes::from_static(&SAMPLE_RESPONSE)))
        .build();

    let mut client = Client::new(device.connect().unwrap(), Config::default());
    let response = client
        .request(0x01, vec![0x01, 0x02, 0x03, 0x04, 0x05])
        .await
        .expect("device should answer");

    assert_eq!(response.response_code(), 0x0A);
    assert_eq!(response.payload_length(), 2);
    assert_eq!(response.crc(), 0x00);
    assert_eq!(&response.payload()[..], &[0xFF, 0xEE]);

    let recorded = device.recorded().await;
    let requests: Vec<_> = recorded.requests().collect();
    assert_eq!(requests.len(), 1);
    assert_eq!(&requests[0][..], &PING_REQUEST);
    assert_eq!(recorded.response_stream(), SAMPLE_RESPONSE);
}

#[tokio::test]
async fn test_byte_at_a_time_delivery() {
    let device = MockDevice::builder()
        .with_default_response(MockResponse::echo())
        .with_chunk_size(1)
        .build();

    let mut client = Client::new(device.connect().unwrap(), Config::default());
    for size in [0usize, 1, 64, 255] {
        let payload: Vec<u8> = (0..size).map(|i| i as u8).collect();
        let response = client.request(0x10, payload.clone()).await.unwrap();
        assert_eq!(response.status().unwrap(), ResponseCode::Ok);
        assert_eq!(&response.payload()[..], &payload[..]);
    }

    assert_eq!(client.statistics().frames_sent, 4);
    assert_eq!(client.statistics().valid_frames_received, 4);
}

#[tokio::test]
async fn test_unknown_operation_code() {
    let device = MockDevice::builder()
        .with_response(0x01, MockResponse::ok(Bytes::new()))
        .build();

    let mut client = Client::new(device.connect().unwrap(), Config::default());
    let response = client.request(0x7F, Bytes::new()).await.unwrap();
    assert_eq!(
        response.status().unwrap(),
        ResponseCode::UnknownOperationCode
    );
}

#[tokio::test]
async fn test_back_to_back_responses_are_kept() {
    let first = ResponseFrame::new(0x00, vec![0x01], 0x00).unwrap();
    let second = ResponseFrame::new(0x02, Bytes::new(), 0x00).unwrap();
    let device = MockDevice::builder()
        .with_response(0x01, MockResponse::raw(response_stream(&[first.clone(), second.clone()])))
        .with_response(0x02, MockResponse::Silent)
        .build();

    let mut client = Client::new(device.connect().unwrap(), Config::default());
    assert_eq!(client.request(0x01, Bytes::new()).await.unwrap(), first);
    // The second frame was already buffered by the reassembler
    assert_eq!(client.request(0x02, Bytes::new()).await.unwrap(), second);
}

#[tokio::test]
async fn test_request_to_other_target() {
    let device = MockDevice::builder()
        .with_target_id(0x02)
        .with_default_response(MockResponse::status(ResponseCode::Ok))
        .build();

    let mut client = Client::new(device.connect().unwrap(), Config::default());
    let response = client.request_to(0x02, 0x01, Bytes::new()).await.unwrap();
    assert!(response.status().unwrap().is_ok());
}

// =============================================================================
// Failure Paths
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_ignored_request_times_out() {
    let device = MockDevice::builder()
        .with_target_id(0x02)
        .with_default_response(MockResponse::status(ResponseCode::Ok))
        .build();

    let config = Config::new()
        .target_id(0x01)
        .response_timeout(Duration::from_secs(10));
    let mut client = Client::new(device.connect().unwrap(), config);

    let err = client.request(0x01, Bytes::new()).await.unwrap_err();
    assert!(matches!(err, Error::ResponseTimeout));
    assert_eq!(client.statistics().timed_out_requests, 1);
}

#[tokio::test]
async fn test_stopped_device_closes_link() {
    let device = MockDevice::builder().build();
    let mut client = Client::new(device.connect().unwrap(), Config::default());

    // Wait for the link task to start, then stop and wait for it to finish
    tokio::time::timeout(Duration::from_secs(5), async {
        while device.connection_count().await == 0 {
            tokio::task::yield_now().await;
        }
        device.stop();
        while device.connection_count().await > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("link task should stop");

    let err = client.request(0x01, Bytes::new()).await.unwrap_err();
    assert!(err.is_transient(), "unexpected error: {err:?}");
}

// =============================================================================
// Polling Session
// =============================================================================

#[test]
fn test_session_over_scripted_transport() {
    let mut transport = MockTransport::new();
    let mut session = Session::new(&mut transport);

    let request = RequestFrame::new(0x01, 0x01, vec![0x01, 0x02, 0x03, 0x04, 0x05]).unwrap();
    session.send(&request).unwrap();

    let stream: Vec<u8> = SAMPLE_RESPONSE.iter().chain(&EMPTY_RESPONSE).copied().collect();
    let mut responses = Vec::new();
    for piece in split_by(&stream, &[2, 1, 4]) {
        session.get_mut().push_bytes(piece);
        responses.extend(session.drain());
    }

    assert_eq!(responses.len(), 2);
    let first = responses[0].as_ref().unwrap();
    assert_eq!(first.response_code(), 0x0A);
    assert_eq!(&first.payload()[..], &[0xFF, 0xEE]);
    let second = responses[1].as_ref().unwrap();
    assert_eq!(second.response_code(), 0x05);
    assert!(second.payload().is_empty());

    assert_eq!(session.statistics().valid_frames_received, 2);
    drop(session);
    assert_eq!(transport.written(), &PING_REQUEST);
}
