//! Benchmarks for frame reassembly.

#![allow(clippy::unwrap_used, missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use mcu_codec::FrameReassembler;
use mcu_protocol::ResponseFrame;

/// A stream of back-to-back responses with the given payload size.
fn stream(payload_size: usize, frames: usize) -> Vec<u8> {
    let response = ResponseFrame::new(0x00, vec![0x5A; payload_size], 0x00).unwrap();
    let encoded = response.encode_to_bytes();
    encoded.iter().copied().cycle().take(encoded.len() * frames).collect()
}

/// Benchmark byte-at-a-time feeding.
fn bench_feed_bytewise(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_bytewise");

    for size in [0usize, 32, 255] {
        let data = stream(size, 64);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| {
                let mut reassembler = FrameReassembler::new();
                let mut count = 0usize;
                for &byte in data {
                    if reassembler.feed(byte).is_some() {
                        count += 1;
                    }
                }
                black_box(count)
            })
        });
    }

    group.finish();
}

/// Benchmark chunked feeding with serial-sized reads.
fn bench_feed_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed_chunked");
    let data = stream(32, 256);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [1usize, 16, 64, 512] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut reassembler = FrameReassembler::new();
                    let mut count = 0usize;
                    for chunk in data.chunks(chunk_size) {
                        count += reassembler.feed_chunk(chunk).count();
                    }
                    black_box(count)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_feed_bytewise, bench_feed_chunked);
criterion_main!(benches);
