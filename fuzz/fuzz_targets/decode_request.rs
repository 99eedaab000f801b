#![no_main]

use libfuzzer_sys::fuzz_target;
use mcu_protocol::RequestFrame;

fuzz_target!(|data: &[u8]| {
    // Fuzz target-side request decoding
    if let Ok(frame) = RequestFrame::decode(data) {
        assert_eq!(&frame.encode_to_bytes()[..], data);
    }
});
