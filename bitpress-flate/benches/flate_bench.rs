//! Round-trip benchmarks for the DEFLATE codec.

use bitpress_flate::{deflate, inflate};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn text_data(size: usize) -> Vec<u8> {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

fn bench_deflate(c: &mut Criterion) {
    let mut group = c.benchmark_group("deflate");
    group.sample_size(10);
    for size in [1024usize, 16 * 1024] {
        let data = text_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| deflate(black_box(data), 2, 1).unwrap());
        });
    }
    group.finish();
}

fn bench_inflate(c: &mut Criterion) {
    let mut group = c.benchmark_group("inflate");
    for size in [1024usize, 16 * 1024] {
        let compressed = deflate(&text_data(size), 2, 1).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &compressed,
            |b, compressed| {
                b.iter(|| inflate(black_box(compressed)).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_deflate, bench_inflate);
criterion_main!(benches);
