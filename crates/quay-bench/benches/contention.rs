//! Criterion benchmarks for multi-threaded reservation under contention.
//!
//! Each iteration fills a fresh generation of the arena from N threads and
//! resets it. Thread spawn cost is included; compare across thread counts
//! rather than against the single-threaded numbers.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use quay_bench::{bench_arena, fill_contended, Payload, BENCH_CAPACITY};
use quay_test_utils::{mixed_until_full, tag};

/// Benchmark: N threads racing single-slot `alloc`.
fn bench_contended_alloc(c: &mut Criterion) {
    let mut arena = bench_arena::<Payload>(BENCH_CAPACITY);
    let mut group = c.benchmark_group("contended_alloc");
    group.throughput(Throughput::Elements(BENCH_CAPACITY as u64));
    for threads in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let counts = fill_contended(&arena, threads, |i| Payload::new(i as u64));
                black_box(counts);
                arena.reset();
            });
        });
    }
    group.finish();

    let stats = arena.stats();
    eprintln!(
        "contended_alloc: {} CAS retries over {} generations",
        stats.cas_retries, stats.generation
    );
}

/// Benchmark: N threads mixing single and bulk reservations.
fn bench_contended_mixed(c: &mut Criterion) {
    let mut arena = bench_arena::<u64>(BENCH_CAPACITY);
    let mut group = c.benchmark_group("contended_mixed");
    group.throughput(Throughput::Elements(BENCH_CAPACITY as u64));
    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let log = mixed_until_full(&arena, threads, &[1, 16, 1, 64], tag);
                black_box(log.total());
                arena.reset();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_contended_alloc, bench_contended_mixed);
criterion_main!(benches);
