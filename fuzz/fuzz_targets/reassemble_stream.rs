#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mcu_codec::FrameReassembler;
use mcu_protocol::ResponseFrame;

#[derive(Debug, Arbitrary)]
struct Input {
    stream: Vec<u8>,
    cuts: Vec<u16>,
}

fuzz_target!(|input: Input| {
    // Chunked feeding must match byte-at-a-time feeding
    let mut bytewise = FrameReassembler::new();
    let expected: Vec<_> = input.stream.iter().filter_map(|&b| bytewise.feed(b)).collect();

    let mut cuts: Vec<usize> = input
        .cuts
        .iter()
        .map(|&c| c as usize % (input.stream.len() + 1))
        .collect();
    cuts.sort_unstable();

    let mut chunked = FrameReassembler::new();
    let mut frames = Vec::new();
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(input.stream.len())) {
        frames.extend(chunked.feed_chunk(&input.stream[start..cut]));
        start = cut;
    }

    assert_eq!(frames, expected);
    assert_eq!(chunked.buffered_len(), bytewise.buffered_len());
    for frame in &frames {
        assert!(ResponseFrame::decode(frame).is_ok());
    }
});
