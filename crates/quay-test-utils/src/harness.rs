//! Multi-threaded drivers that fill an arena and record who claimed what.
//!
//! Every driver releases its workers through a [`Barrier`] so they hit the
//! reservation counter at the same moment, then collects one [`Claim`] per
//! successful reservation over a crossbeam channel. [`ClaimLog`] checks the
//! claims against the arena's partition invariant.

use std::sync::Barrier;
use std::thread;

use crossbeam_channel::Sender;
use quay_arena::AtomicArena;

/// One successful reservation: `len` slots starting at `start`, claimed by
/// worker `thread`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Claim {
    pub thread: usize,
    pub start: usize,
    pub len: usize,
}

/// All claims recorded by a driver run.
#[derive(Clone, Debug, Default)]
pub struct ClaimLog {
    pub claims: Vec<Claim>,
}

impl ClaimLog {
    /// Total slots claimed.
    pub fn total(&self) -> usize {
        self.claims.iter().map(|c| c.len).sum()
    }

    /// Claims made by `thread`, in the order that worker made them.
    pub fn by_thread(&self, thread: usize) -> Vec<Claim> {
        self.claims
            .iter()
            .filter(|c| c.thread == thread)
            .copied()
            .collect()
    }

    /// Check that the claims tile `[0, capacity)` exactly: no overlap, no gap.
    pub fn check_partition(&self, capacity: usize) -> Result<(), String> {
        let mut claims = self.claims.clone();
        claims.sort_unstable_by_key(|c| c.start);
        let mut next = 0;
        for claim in &claims {
            if claim.start < next {
                return Err(format!("overlapping claim {claim:?}, expected start >= {next}"));
            }
            if claim.start > next {
                return Err(format!("gap [{next}, {}) before claim {claim:?}", claim.start));
            }
            next = claim.start + claim.len;
        }
        if next != capacity {
            return Err(format!("claims end at {next}, capacity is {capacity}"));
        }
        Ok(())
    }

    /// Panicking form of [`ClaimLog::check_partition`].
    pub fn assert_partition(&self, capacity: usize) {
        if let Err(msg) = self.check_partition(capacity) {
            panic!("claim partition violated: {msg}");
        }
    }
}

/// `threads` workers allocate until the arena reports `CapacityExceeded`.
///
/// `make(thread, seq)` builds each worker's `seq`-th value. Values are built
/// through `alloc_with`, so a rejected request constructs nothing.
pub fn alloc_until_full<T, F>(arena: &AtomicArena<T>, threads: usize, make: F) -> ClaimLog
where
    T: Send + Sync,
    F: Fn(usize, usize) -> T + Sync,
{
    run_workers(threads, |thread, tx| {
        for seq in 0.. {
            match arena.alloc_with(|| make(thread, seq)) {
                Ok(slot) => send(tx, thread, slot.index(), 1),
                Err(_) => break,
            }
        }
    })
}

/// `threads` workers call `append_slice` with `batch` values at a time until
/// no batch fits, then top up with single `alloc`s until the arena is full.
///
/// Every slot ends up claimed, so the log always tiles `[0, capacity)`.
pub fn append_until_full<T, F>(
    arena: &AtomicArena<T>,
    threads: usize,
    batch: usize,
    make: F,
) -> ClaimLog
where
    T: Send + Sync,
    F: Fn(usize, usize) -> T + Sync,
{
    mixed_until_full(arena, threads, &[batch], make)
}

/// Like [`append_until_full`], but worker `t` cycles through `batches`
/// starting at offset `t`. A batch of 1 goes through `alloc`.
///
/// # Panics
///
/// Panics if `batches` is empty or contains a zero.
pub fn mixed_until_full<T, F>(
    arena: &AtomicArena<T>,
    threads: usize,
    batches: &[usize],
    make: F,
) -> ClaimLog
where
    T: Send + Sync,
    F: Fn(usize, usize) -> T + Sync,
{
    assert!(
        !batches.is_empty() && !batches.contains(&0),
        "batch sizes must be positive"
    );
    run_workers(threads, |thread, tx| {
        let mut seq = 0;
        let mut turn = thread;
        loop {
            let batch = batches[turn % batches.len()];
            turn += 1;
            if batch == 1 {
                match arena.alloc_with(|| make(thread, seq)) {
                    Ok(slot) => {
                        send(tx, thread, slot.index(), 1);
                        seq += 1;
                        continue;
                    }
                    Err(_) => break,
                }
            }
            let values = (seq..seq + batch).map(|s| make(thread, s));
            match arena.append_slice(values) {
                Ok(run) => {
                    send(tx, thread, run.start(), run.len());
                    seq += batch;
                }
                Err(_) => {
                    // Fall back to single slots for whatever is left.
                    while let Ok(slot) = arena.alloc_with(|| make(thread, seq)) {
                        send(tx, thread, slot.index(), 1);
                        seq += 1;
                    }
                    break;
                }
            }
        }
    })
}

/// Outcome of [`read_while_filling`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadReport {
    /// Slots the reader observed as published.
    pub observed: usize,
    /// Observed values that failed the integrity check.
    pub corrupt: Vec<usize>,
}

/// Fill the arena from `writers` threads while one reader polls every slot
/// in index order, waiting for each to become visible through `get` and
/// checking it with `intact`.
///
/// Returns the writers' claim log and the reader's report.
pub fn read_while_filling<T, F, C>(
    arena: &AtomicArena<T>,
    writers: usize,
    make: F,
    intact: C,
) -> (ClaimLog, ReadReport)
where
    T: Send + Sync,
    F: Fn(usize, usize) -> T + Sync,
    C: Fn(&T) -> bool + Sync,
{
    let capacity = arena.capacity();
    let barrier = Barrier::new(writers + 1);
    let (tx, rx) = crossbeam_channel::unbounded();

    let report = thread::scope(|s| {
        for thread in 0..writers {
            let tx = tx.clone();
            let barrier = &barrier;
            let make = &make;
            s.spawn(move || {
                barrier.wait();
                for seq in 0.. {
                    match arena.alloc_with(|| make(thread, seq)) {
                        Ok(slot) => send(&tx, thread, slot.index(), 1),
                        Err(_) => break,
                    }
                }
            });
        }

        let reader = s.spawn(|| {
            barrier.wait();
            let mut report = ReadReport::default();
            for index in 0..capacity {
                let slot = loop {
                    if let Some(slot) = arena.get(index) {
                        break slot;
                    }
                    std::hint::spin_loop();
                };
                report.observed += 1;
                if !intact(slot.get()) {
                    report.corrupt.push(index);
                }
            }
            report
        });
        reader.join().expect("reader thread panicked")
    });

    drop(tx);
    let log = ClaimLog {
        claims: rx.iter().collect(),
    };
    (log, report)
}

/// Spawn `threads` scoped workers behind a common barrier and gather the
/// claims they send.
fn run_workers<W>(threads: usize, work: W) -> ClaimLog
where
    W: Fn(usize, &Sender<Claim>) + Sync,
{
    let barrier = Barrier::new(threads);
    let (tx, rx) = crossbeam_channel::unbounded();

    thread::scope(|s| {
        for thread in 0..threads {
            let tx = tx.clone();
            let barrier = &barrier;
            let work = &work;
            s.spawn(move || {
                barrier.wait();
                work(thread, &tx);
            });
        }
    });

    drop(tx);
    ClaimLog {
        claims: rx.iter().collect(),
    }
}

fn send(tx: &Sender<Claim>, thread: usize, start: usize, len: usize) {
    tx.send(Claim { thread, start, len })
        .expect("claim receiver outlives workers");
}
