//! Benchmarks for configuration parsing and a full request cycle.

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use mcu_client::{Client, Config};
use std::hint::black_box;

/// Benchmark connection string parsing.
fn bench_connection_string_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("connection_string");

    let full = "Port=COM6;Baud=115200;Target=0x01;Timeout=10";
    group.throughput(Throughput::Bytes(full.len() as u64));
    group.bench_function("full", |b| {
        b.iter(|| black_box(Config::from_connection_string(black_box(full))))
    });

    group.finish();
}

/// Benchmark one request/response cycle against a scripted transport.
fn bench_request_cycle(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let payload = vec![0xA5u8; 32];
    let mut request_bytes = vec![0x01, 0x01, 32, 0x00];
    request_bytes.extend_from_slice(&payload);
    let mut response_bytes = vec![0x00, 32, 0x00];
    response_bytes.extend_from_slice(&payload);

    c.bench_function("request_cycle", |b| {
        b.to_async(&runtime).iter(|| {
            let mock = tokio_test::io::Builder::new()
                .write(&request_bytes)
                .read(&response_bytes)
                .build();
            let payload = payload.clone();
            async move {
                let mut client = Client::new(mock, Config::default());
                black_box(client.request(0x01, payload).await.unwrap())
            }
        })
    });
}

criterion_group!(benches, bench_connection_string_parsing, bench_request_cycle);
criterion_main!(benches);
