//! Point-in-time occupancy and contention figures for an arena.
//!
//! [`ArenaStats`] is a plain snapshot: reading it does not synchronise with
//! in-flight allocations, so under concurrency the fields are individually
//! accurate but not mutually consistent.

/// Occupancy and contention counters collected from an
/// [`AtomicArena`](crate::AtomicArena).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Fixed slot capacity.
    pub capacity: usize,
    /// Slots currently reserved.
    pub used: usize,
    /// Slots still free.
    pub remaining: usize,
    /// Largest `used` value observed across all generations.
    pub high_water_mark: usize,
    /// Number of resets performed.
    pub generation: u64,
    /// Cumulative compare-and-exchange attempts lost to contention
    /// (including spurious failures).
    pub cas_retries: u64,
    /// Cumulative reservations rejected with `CapacityExceeded`.
    pub capacity_rejections: u64,
    /// Bytes held by element storage plus the publication table.
    pub memory_bytes: usize,
}

impl ArenaStats {
    /// Fraction of capacity in use, in `[0.0, 1.0]`.
    pub fn occupancy(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.used as f64 / self.capacity as f64
    }
}
