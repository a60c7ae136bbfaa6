//! Throughput benchmarks for the CRC-32 implementation.

use bitpress_core::crc::Crc32;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Reproducible pseudo-random data via a linear congruential generator.
fn random_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 0x123456789ABCDEF0;
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

fn bench_crc32(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc32");
    for size in [64usize, 4096, 65536, 1 << 20] {
        let data = random_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| Crc32::compute(black_box(data)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_crc32);
criterion_main!(benches);
