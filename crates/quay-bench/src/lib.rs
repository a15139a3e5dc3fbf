//! Benchmark workloads for the quay arena.
//!
//! Provides reusable fill patterns for benchmarks and profiling runs:
//!
//! - [`fill_single`]: one thread, one `alloc` per slot
//! - [`fill_batched`]: one thread, `append_slice` in fixed-size batches
//! - [`fill_contended`]: N threads racing `alloc` until the arena is full
//! - [`Payload`]: a 64-byte element representative of a pooled request object

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::thread;

use quay_arena::AtomicArena;

/// Default slot count for benchmark arenas.
pub const BENCH_CAPACITY: usize = 65_536;

/// A 64-byte element: eight words, as a pooled request/frame object might be.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payload {
    /// Payload words.
    pub words: [u64; 8],
}

impl Payload {
    /// A payload with every word derived from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut words = [0; 8];
        for (i, w) in words.iter_mut().enumerate() {
            *w = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(i as u32 * 8);
        }
        Self { words }
    }
}

/// Build a benchmark arena of `capacity` slots.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn bench_arena<T: Default>(capacity: usize) -> AtomicArena<T> {
    AtomicArena::new(capacity).expect("benchmark capacity is positive")
}

/// Fill the arena one `alloc` at a time from the current thread.
///
/// Returns the number of slots written.
pub fn fill_single<T, F>(arena: &AtomicArena<T>, make: F) -> usize
where
    F: Fn(usize) -> T,
{
    let mut written = 0;
    while arena.alloc_with(|| make(written)).is_ok() {
        written += 1;
    }
    written
}

/// Fill the arena with `append_slice` runs of `batch` values, topping up the
/// tail with single allocations.
///
/// Returns the number of slots written.
///
/// # Panics
///
/// Panics if `batch` is zero.
pub fn fill_batched<T, F>(arena: &AtomicArena<T>, batch: usize, make: F) -> usize
where
    F: Fn(usize) -> T,
{
    assert!(batch > 0, "batch must be positive");
    let mut written = 0;
    while arena
        .append_slice((written..written + batch).map(&make))
        .is_ok()
    {
        written += batch;
    }
    while arena.alloc_with(|| make(written)).is_ok() {
        written += 1;
    }
    written
}

/// Fill the arena from `threads` scoped threads racing on `alloc`.
///
/// Returns the per-thread slot counts.
pub fn fill_contended<T, F>(arena: &AtomicArena<T>, threads: usize, make: F) -> Vec<usize>
where
    T: Send + Sync,
    F: Fn(usize) -> T + Sync,
{
    thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|_| {
                let make = &make;
                s.spawn(move || {
                    let mut written = 0;
                    while arena.alloc_with(|| make(written)).is_ok() {
                        written += 1;
                    }
                    written
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().expect("benchmark worker panicked"))
            .collect()
    })
}
