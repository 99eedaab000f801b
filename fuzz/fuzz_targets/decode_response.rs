#![no_main]

use libfuzzer_sys::fuzz_target;
use mcu_protocol::{RESPONSE_HEADER_SIZE, ResponseFrame};

fuzz_target!(|data: &[u8]| {
    // Decode must succeed exactly when the length byte matches the buffer
    let result = ResponseFrame::decode(data);
    let consistent = data.len() >= RESPONSE_HEADER_SIZE
        && data.len() == data[1] as usize + RESPONSE_HEADER_SIZE;
    assert_eq!(result.is_ok(), consistent);

    if let Ok(frame) = result {
        assert_eq!(&frame.encode_to_bytes()[..], data);
    }
});
