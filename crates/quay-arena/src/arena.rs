//! Fixed-capacity, lock-free bump arena for a single element type.
//!
//! [`AtomicArena`] hands out stable storage for values of `T` drawn from a
//! buffer allocated once at construction. Allocation takes `&self` and is
//! safe to call from any number of threads; reclamation is all-at-once via
//! [`AtomicArena::reset`].
//!
//! The lifecycle per batch is:
//! 1. `alloc()` / `append_slice()` from any thread: reserve, write, publish
//! 2. Read values through the returned handles or `get()`
//! 3. `reset()`: requires `&mut self`, so every handle must be dropped first
//!
//! # Reservation
//!
//! A single atomic counter partitions `[0, capacity)` among callers. Each
//! request checks capacity against a freshly observed count before its
//! compare-and-exchange, so the counter never overshoots and a bulk request
//! either claims its whole contiguous range or nothing.
//!
//! # Publication
//!
//! After writing a slot, the owner stores a pointer to it into the slot's
//! publication entry with `Release`. [`AtomicArena::get`] loads that entry
//! with `Acquire`, so a reader that sees a slot also sees its complete value.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::config::{ArenaConfig, ResetMode};
use crate::error::ArenaError;
use crate::handle::{SliceRef, SlotRef};
use crate::raw::RawSlots;
use crate::stats::ArenaStats;

/// Fixed-capacity arena with lock-free concurrent allocation.
///
/// # Example
///
/// ```
/// use quay_arena::{AtomicArena, ArenaError, ResetMode};
///
/// let mut arena = AtomicArena::<i64>::new(3).unwrap();
/// let a = arena.alloc(10).unwrap();
/// let b = arena.alloc(20).unwrap();
/// let c = arena.alloc(30).unwrap();
/// assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
/// assert!(matches!(arena.alloc(40), Err(ArenaError::CapacityExceeded { .. })));
///
/// arena.reset_with(ResetMode::Fast);
/// let d = arena.alloc(99).unwrap();
/// assert_eq!((d.index(), *d), (0, 99));
/// ```
pub struct AtomicArena<T> {
    slots: RawSlots<T>,
    config: ArenaConfig,
    /// Number of resets performed.
    generation: AtomicU64,
    /// Largest count seen at any reset. `stats()` folds in the live count.
    high_water_mark: AtomicUsize,
    capacity_rejections: AtomicU64,
}

// Compile-time assertion: AtomicArena must be Send + Sync for shareable T.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<AtomicArena<u64>>();
    assert::<AtomicArena<String>>();
};

impl<T: Default> AtomicArena<T> {
    /// Create an arena with `capacity` slots and fast reset.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] if `capacity` is zero or too
    /// large to address.
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create an arena from a validated [`ArenaConfig`].
    ///
    /// Storage and the publication table are allocated here, once; every
    /// slot starts as `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] if validation fails.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate::<T>()?;
        log::debug!(
            "allocating arena: {} slots of {} bytes, {:?} reset",
            config.capacity,
            std::mem::size_of::<T>(),
            config.reset_mode,
        );
        Ok(Self {
            slots: RawSlots::new(config.capacity),
            config,
            generation: AtomicU64::new(0),
            high_water_mark: AtomicUsize::new(0),
            capacity_rejections: AtomicU64::new(0),
        })
    }

    /// Reclaim every slot using the configured [`ResetMode`].
    ///
    /// Taking `&mut self` guarantees no allocation is in flight and no
    /// handle from the previous generation is still alive.
    pub fn reset(&mut self) {
        self.reset_with(self.config.reset_mode);
    }

    /// Reclaim every slot using `mode`.
    pub fn reset_with(&mut self, mode: ResetMode) {
        let reclaimed = self.slots.clear(mode == ResetMode::Release);
        let hwm = self.high_water_mark.get_mut();
        *hwm = (*hwm).max(reclaimed);
        let generation = self.generation.get_mut();
        *generation += 1;
        log::debug!("arena reset ({mode:?}): reclaimed {reclaimed} slots, generation {generation}");
    }

    /// Reclaim every slot through a shared reference.
    ///
    /// For arenas shared via `Arc` whose owners coordinate quiescence by
    /// other means. Prefer [`AtomicArena::reset`] wherever `&mut` access is
    /// available.
    ///
    /// # Safety
    ///
    /// - No `alloc`, `append_slice`, `get`, or `iter` call may be in flight
    ///   on any thread while this runs.
    /// - No handle or reference obtained from this arena before the call may
    ///   be used after it.
    #[allow(unsafe_code)]
    pub unsafe fn reset_unsynchronized(&self, mode: ResetMode) {
        // SAFETY: forwarded from this function's contract.
        let reclaimed = unsafe { self.slots.clear_shared(mode == ResetMode::Release) };
        self.high_water_mark.fetch_max(reclaimed, Ordering::Relaxed);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!(
            "arena reset ({mode:?}, unsynchronized): reclaimed {reclaimed} slots, generation {generation}"
        );
    }
}

impl<T> AtomicArena<T> {
    /// Store `value` in the next free slot and return a handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::CapacityExceeded`] if the arena is full; nothing
    /// is stored and `value` is dropped.
    pub fn alloc(&self, value: T) -> Result<SlotRef<'_, T>, ArenaError> {
        self.alloc_with(|| value)
    }

    /// Like [`AtomicArena::alloc`], but builds the value only once a slot is
    /// secured. `f` is never called on the `CapacityExceeded` path.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::CapacityExceeded`] if the arena is full.
    ///
    /// # Panics
    ///
    /// Propagates a panic from `f`. Nothing is published and the slot is
    /// returned to the arena, unless another allocation reserved a slot after
    /// it in the meantime: then it stays counted in [`AtomicArena::len`] but
    /// empty (never visible through `get` or `iter`) until the next reset.
    pub fn alloc_with<F>(&self, f: F) -> Result<SlotRef<'_, T>, ArenaError>
    where
        F: FnOnce() -> T,
    {
        match self.slots.push_with(f) {
            Ok((index, value)) => Ok(SlotRef::new(index, value)),
            Err(observed) => Err(self.reject(1, observed)),
        }
    }

    /// Store `values` in contiguous slots, all or nothing.
    ///
    /// Values are written in input order and the returned handle derefs to
    /// them as a slice. An empty input succeeds without reserving anything.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::CapacityExceeded`] if fewer than `values.len()`
    /// slots remain; no value is stored and the reservation count is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the iterator yields fewer items than its reported length,
    /// and propagates any panic raised by the iterator. In both cases no value
    /// of the run is published and the range is returned to the arena, unless
    /// another allocation reserved slots after it in the meantime: then the
    /// range stays counted in [`AtomicArena::len`] but empty (never visible
    /// through `get` or `iter`) until the next reset.
    pub fn append_slice<I>(&self, values: I) -> Result<SliceRef<'_, T>, ArenaError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        let requested = values.len();
        match self.slots.extend(values) {
            Ok((start, values)) => Ok(SliceRef::new(start, values)),
            Err(observed) => Err(self.reject(requested, observed)),
        }
    }

    /// Clone `values` into contiguous slots, all or nothing.
    ///
    /// # Errors
    ///
    /// Same as [`AtomicArena::append_slice`].
    pub fn append_slice_cloned(&self, values: &[T]) -> Result<SliceRef<'_, T>, ArenaError>
    where
        T: Clone,
    {
        self.append_slice(values.iter().cloned())
    }

    /// The published value at `index`, if any.
    ///
    /// Returns `None` for free slots, for slots reserved by another thread
    /// that has not finished publishing yet, and for out-of-range indices.
    pub fn get(&self, index: usize) -> Option<SlotRef<'_, T>> {
        self.slots
            .get(index)
            .map(|value| SlotRef::new(index, value))
    }

    /// Exclusive access to the published value at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Published values in index order.
    ///
    /// Covers the slots reserved when the iterator was created; a slot whose
    /// writer has not yet published is skipped.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: self,
            next: 0,
            end: self.len(),
        }
    }

    /// Raw view of every storage slot, reserved or not.
    ///
    /// After a [`ResetMode::Fast`] reset this still shows the previous
    /// generation's values; after [`ResetMode::Release`] every slot reads as
    /// `T::default()` until reallocated.
    pub fn storage(&mut self) -> &[T] {
        self.slots.storage()
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Fixed slot capacity.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of reserved slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is reserved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of free slots.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Whether every slot is reserved.
    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// Number of resets performed so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Bytes held by element storage plus the publication table.
    pub fn memory_bytes(&self) -> usize {
        // Validated at construction, so this cannot overflow.
        self.config.memory_bytes::<T>().unwrap_or(usize::MAX)
    }

    /// Snapshot of occupancy and contention counters.
    pub fn stats(&self) -> ArenaStats {
        let used = self.len();
        ArenaStats {
            capacity: self.capacity(),
            used,
            remaining: self.capacity() - used,
            high_water_mark: self.high_water_mark.load(Ordering::Relaxed).max(used),
            generation: self.generation(),
            cas_retries: self.slots.retries(),
            capacity_rejections: self.capacity_rejections.load(Ordering::Relaxed),
            memory_bytes: self.memory_bytes(),
        }
    }

    fn reject(&self, requested: usize, observed: usize) -> ArenaError {
        self.capacity_rejections.fetch_add(1, Ordering::Relaxed);
        let capacity = self.capacity();
        let remaining = capacity.saturating_sub(observed);
        log::trace!("arena reservation of {requested} rejected: {remaining} of {capacity} free");
        ArenaError::CapacityExceeded {
            requested,
            remaining,
            capacity,
        }
    }
}

impl<T> fmt::Debug for AtomicArena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicArena")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a AtomicArena<T> {
    type Item = SlotRef<'a, T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Iterator over the published slots of an [`AtomicArena`].
pub struct Iter<'a, T> {
    arena: &'a AtomicArena<T>,
    next: usize,
    end: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = SlotRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let index = self.next;
            self.next += 1;
            if let Some(slot) = self.arena.get(index) {
                return Some(slot);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    fn arena(capacity: usize) -> AtomicArena<u64> {
        AtomicArena::new(capacity).unwrap()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = AtomicArena::<u64>::new(0).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }

    #[test]
    fn capacity_three_walkthrough() {
        let mut arena = arena(3);
        assert_eq!(arena.alloc(10).unwrap().index(), 0);
        assert_eq!(arena.alloc(20).unwrap().index(), 1);
        assert_eq!(arena.alloc(30).unwrap().index(), 2);
        assert_eq!(
            arena.alloc(40).unwrap_err(),
            ArenaError::CapacityExceeded {
                requested: 1,
                remaining: 0,
                capacity: 3,
            }
        );
        assert_eq!(arena.len(), 3);

        arena.reset_with(ResetMode::Fast);
        let slot = arena.alloc(99).unwrap();
        assert_eq!(slot.index(), 0);
        assert_eq!(*slot, 99);
        assert_eq!(arena.get(0).map(|s| *s), Some(99));
    }

    #[test]
    fn failed_alloc_stores_nothing() {
        let arena = arena(1);
        arena.alloc(1).unwrap();
        let before = arena.stats();
        assert!(arena.alloc(2).is_err());
        let after = arena.stats();
        assert_eq!(before.used, after.used);
        assert_eq!(after.capacity_rejections, before.capacity_rejections + 1);
        assert!(arena.get(1).is_none());
    }

    #[test]
    fn alloc_with_skips_constructor_when_full() {
        let arena = arena(1);
        arena.alloc_with(|| 5).unwrap();
        let result = arena.alloc_with(|| unreachable!("slot was never secured"));
        assert!(result.unwrap_err().is_capacity_exceeded());
    }

    #[test]
    fn append_slice_returns_values_in_order() {
        let arena = arena(8);
        arena.alloc(1).unwrap();
        let run = arena.append_slice([10, 20, 30]).unwrap();
        assert_eq!(run.indices(), 1..4);
        assert_eq!(run.as_slice(), &[10, 20, 30]);
        for (offset, slot) in run.iter().enumerate() {
            assert_eq!(slot.index(), 1 + offset);
            assert_eq!(arena.get(slot.index()).map(|s| *s), Some(*slot));
        }
    }

    #[test]
    fn append_slice_over_capacity_is_all_or_nothing() {
        let arena = arena(4);
        arena.append_slice([1, 2]).unwrap();
        let err = arena.append_slice([3, 4, 5]).unwrap_err();
        assert_eq!(
            err,
            ArenaError::CapacityExceeded {
                requested: 3,
                remaining: 2,
                capacity: 4,
            }
        );
        assert_eq!(arena.len(), 2);
        assert!(arena.get(2).is_none());
        // The remaining two slots are still usable.
        assert_eq!(arena.append_slice([3, 4]).unwrap().indices(), 2..4);
    }

    #[test]
    fn append_empty_slice_succeeds_even_when_full() {
        let arena = arena(1);
        arena.alloc(1).unwrap();
        let run = arena.append_slice(Vec::new()).unwrap();
        assert!(run.is_empty());
        assert_eq!(run.start(), 1);
    }

    #[test]
    fn append_slice_cloned_copies_input() {
        let arena = AtomicArena::<String>::new(4).unwrap();
        let input = vec!["a".to_string(), "b".to_string()];
        let run = arena.append_slice_cloned(&input).unwrap();
        assert_eq!(run.as_slice(), input.as_slice());
    }

    #[test]
    fn fast_reset_leaves_stale_storage() {
        let mut arena = arena(2);
        arena.append_slice([7, 8]).unwrap();
        arena.reset_with(ResetMode::Fast);
        assert!(arena.is_empty());
        assert!(arena.get(0).is_none());
        assert_eq!(arena.storage(), &[7, 8]);
    }

    #[test]
    fn release_reset_zeroes_storage() {
        let mut arena = arena(3);
        arena.append_slice([7, 8, 9]).unwrap();
        arena.reset_with(ResetMode::Release);
        assert!(arena.storage().iter().all(|&v| v == 0));
        arena.alloc(5).unwrap();
        assert_eq!(arena.storage(), &[5, 0, 0]);
    }

    #[test]
    fn reset_uses_configured_mode() {
        let config = ArenaConfig::new(2).with_reset_mode(ResetMode::Release);
        let mut arena = AtomicArena::<u64>::with_config(config).unwrap();
        arena.alloc(3).unwrap();
        arena.reset();
        assert_eq!(arena.storage(), &[0, 0]);
        assert_eq!(arena.generation(), 1);
    }

    #[test]
    fn release_reset_drops_owned_values() {
        let mut arena = AtomicArena::<Option<Arc<()>>>::new(2).unwrap();
        let tracker = Arc::new(());
        arena.alloc(Some(Arc::clone(&tracker))).unwrap();
        assert_eq!(Arc::strong_count(&tracker), 2);

        arena.reset_with(ResetMode::Fast);
        assert_eq!(Arc::strong_count(&tracker), 2, "fast reset keeps stale value");

        arena.reset_with(ResetMode::Release);
        assert_eq!(Arc::strong_count(&tracker), 1);
    }

    #[test]
    fn overwriting_a_stale_slot_drops_it() {
        let mut arena = AtomicArena::<Option<Arc<()>>>::new(1).unwrap();
        let tracker = Arc::new(());
        arena.alloc(Some(Arc::clone(&tracker))).unwrap();
        arena.reset();
        arena.alloc(None).unwrap();
        assert_eq!(Arc::strong_count(&tracker), 1);
    }

    #[test]
    fn dropping_arena_drops_values() {
        let tracker = Arc::new(());
        {
            let arena = AtomicArena::<Option<Arc<()>>>::new(4).unwrap();
            arena
                .append_slice(vec![Some(Arc::clone(&tracker)); 3])
                .unwrap();
            assert_eq!(Arc::strong_count(&tracker), 4);
        }
        assert_eq!(Arc::strong_count(&tracker), 1);
    }

    #[test]
    #[allow(unsafe_code)]
    fn unsynchronized_reset_through_arc() {
        let arena = Arc::new(arena(2));
        arena.alloc(1).unwrap();
        arena.alloc(2).unwrap();
        assert!(arena.is_full());
        // SAFETY: single thread, no handles outlive the statements above.
        unsafe { arena.reset_unsynchronized(ResetMode::Release) };
        assert!(arena.is_empty());
        assert_eq!(arena.generation(), 1);
        assert_eq!(arena.alloc(3).unwrap().index(), 0);
    }

    #[test]
    fn get_mut_only_reaches_published_slots() {
        let mut arena = arena(2);
        arena.alloc(1).unwrap();
        *arena.get_mut(0).unwrap() += 41;
        assert_eq!(arena.get(0).map(|s| *s), Some(42));
        assert!(arena.get_mut(1).is_none());
        assert!(arena.get_mut(5).is_none());
    }

    #[test]
    fn iter_visits_published_slots_in_order() {
        let arena = arena(5);
        arena.alloc(1).unwrap();
        arena.append_slice([2, 3]).unwrap();
        let seen: Vec<(usize, u64)> = arena.iter().map(|s| (s.index(), *s)).collect();
        assert_eq!(seen, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!((&arena).into_iter().count(), 3);
    }

    #[test]
    fn stats_track_high_water_mark_across_resets() {
        let mut arena = arena(4);
        arena.append_slice([1, 2, 3]).unwrap();
        arena.reset();
        arena.alloc(1).unwrap();
        let stats = arena.stats();
        assert_eq!(stats.used, 1);
        assert_eq!(stats.remaining, 3);
        assert_eq!(stats.high_water_mark, 3);
        assert_eq!(stats.generation, 1);
        assert_eq!(stats.memory_bytes, arena.memory_bytes());
    }

    #[test]
    fn memory_bytes_counts_storage_and_table() {
        let arena = AtomicArena::<u32>::new(10).unwrap();
        assert_eq!(
            arena.memory_bytes(),
            10 * (4 + std::mem::size_of::<usize>())
        );
    }

    #[test]
    fn zero_sized_elements_are_counted() {
        let arena = AtomicArena::<()>::new(2).unwrap();
        assert_eq!(arena.alloc(()).unwrap().index(), 0);
        assert_eq!(arena.append_slice([()]).unwrap().indices(), 1..2);
        assert!(arena.alloc(()).is_err());
    }

    #[test]
    fn debug_shows_stats_not_contents() {
        let arena = arena(2);
        let text = format!("{arena:?}");
        assert!(text.contains("AtomicArena"));
        assert!(text.contains("capacity: 2"));
    }

    #[test]
    fn panicking_append_returns_its_range() {
        let arena = arena(4);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            arena
                .append_slice((0..3usize).map(|i| if i == 1 { panic!("bad input") } else { i as u64 }))
                .map(|run| run.len())
        }));
        assert!(result.is_err());
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.remaining(), 4);
        assert!(arena.get(0).is_none());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            arena.alloc_with(|| panic!("bad constructor")).map(|slot| slot.index())
        }));
        assert!(result.is_err());
        assert!(arena.is_empty());

        // The whole capacity is still usable.
        assert_eq!(arena.append_slice([1, 2, 3, 4]).unwrap().indices(), 0..4);
    }

    #[test]
    fn panicking_append_behind_a_later_alloc_leaves_a_hole() {
        let arena = arena(4);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let values = (0..2usize).map(|i| {
                if i == 1 {
                    arena.alloc(9).unwrap();
                    panic!("after a nested alloc");
                }
                i as u64
            });
            arena.append_slice(values).map(|run| run.len())
        }));
        assert!(result.is_err());

        // [0, 2) could not be handed back past slot 2.
        assert_eq!(arena.len(), 3);
        assert!(arena.get(0).is_none());
        assert!(arena.get(1).is_none());
        assert_eq!(arena.get(2).map(|s| *s), Some(9));
        let seen: Vec<u64> = arena.iter().map(|s| *s).collect();
        assert_eq!(seen, vec![9]);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Alloc(u64),
            Append(Vec<u64>),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<u64>().prop_map(Op::Alloc),
                prop::collection::vec(any::<u64>(), 0..6).prop_map(Op::Append),
            ]
        }

        proptest! {
            #[test]
            fn single_thread_ops_match_model(
                capacity in 1usize..32,
                ops in prop::collection::vec(arb_op(), 0..40),
            ) {
                let arena = AtomicArena::<u64>::new(capacity).unwrap();
                let mut model: Vec<u64> = Vec::new();

                for op in ops {
                    match op {
                        Op::Alloc(v) => match arena.alloc(v) {
                            Ok(slot) => {
                                prop_assert_eq!(slot.index(), model.len());
                                model.push(v);
                            }
                            Err(_) => {
                                prop_assert_eq!(model.len(), capacity);
                            }
                        },
                        Op::Append(vs) => {
                            let fits = model.len() + vs.len() <= capacity;
                            match arena.append_slice(vs.clone()) {
                                Ok(run) => {
                                    prop_assert!(fits);
                                    prop_assert_eq!(run.start(), model.len());
                                    prop_assert_eq!(run.as_slice(), vs.as_slice());
                                    model.extend(vs);
                                }
                                Err(_) => {
                                    prop_assert!(!fits);
                                }
                            }
                        }
                    }
                    prop_assert_eq!(arena.len(), model.len());
                }

                let stored: Vec<u64> = arena.iter().map(|s| *s).collect();
                prop_assert_eq!(stored, model);
            }

            #[test]
            fn refill_after_reset_starts_at_zero(
                capacity in 1usize..16,
                first in 0usize..16,
                release in any::<bool>(),
            ) {
                let mut arena = AtomicArena::<u64>::new(capacity).unwrap();
                for i in 0..first.min(capacity) {
                    arena.alloc(i as u64 + 100).unwrap();
                }
                let mode = if release { ResetMode::Release } else { ResetMode::Fast };
                arena.reset_with(mode);
                for i in 0..capacity {
                    prop_assert_eq!(arena.alloc(i as u64).unwrap().index(), i);
                }
                prop_assert!(arena.alloc(0).is_err());
            }
        }
    }
}
