//! Slot storage, reservation counter, and publication table.
//!
//! Every `unsafe` operation in this crate lives in this module. Soundness
//! rests on one rule: a slot is written only by the caller that won the
//! compare-and-exchange reserving it, and only while its publication entry is
//! null. Readers dereference a slot solely through a non-null publication
//! entry, loaded with `Acquire` to pair with the writer's `Release` store.
//! Clearing the table (reset) either holds `&mut self` or is an `unsafe fn`
//! whose caller guarantees quiescence.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::ptr;
use std::slice;
use std::sync::atomic::{AtomicPtr, AtomicU64, AtomicUsize, Ordering};

/// Reservation counter on its own cache line.
///
/// 128-byte alignment covers both 64-byte (x86) and 128-byte (Apple
/// M-series) lines, so counter traffic does not evict neighbouring fields.
#[repr(align(128))]
struct PaddedCount(AtomicUsize);

/// A claimed range `[start, end)` that has not been published yet.
///
/// Dropping it without [`Reservation::commit`] (the writer unwound) hands the
/// range back to the counter, provided nothing was reserved after it. If a
/// later reservation exists the range cannot be returned and stays reserved
/// but unpublished until the next reset.
struct Reservation<'a> {
    count: &'a AtomicUsize,
    start: usize,
    end: usize,
}

impl Reservation<'_> {
    /// Keep the range: every slot in it is about to be published.
    fn commit(self) -> usize {
        let start = self.start;
        std::mem::forget(self);
        start
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        let _ = self.count.compare_exchange(
            self.end,
            self.start,
            Ordering::AcqRel,
            Ordering::Relaxed,
        );
    }
}

/// Fixed-capacity slot table shared by concurrent writers.
///
/// Storage is always fully initialised: slots start as `T::default()` and
/// are only ever overwritten in place, never left uninitialised.
pub(crate) struct RawSlots<T> {
    cells: Box<[UnsafeCell<T>]>,
    published: Box<[AtomicPtr<T>]>,
    count: PaddedCount,
    /// Lost (or spuriously failed) compare-and-exchange attempts.
    retries: AtomicU64,
}

// SAFETY: shared access to `cells` is mediated by the reservation counter
// (disjoint writers) and the publication table (release/acquire readers).
// Values are written on one thread and read or dropped on others, hence
// `T: Send + Sync`.
unsafe impl<T: Send + Sync> Sync for RawSlots<T> {}

impl<T: Default> RawSlots<T> {
    /// Allocate `capacity` default-initialised slots and an empty table.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            cells: (0..capacity).map(|_| UnsafeCell::new(T::default())).collect(),
            published: (0..capacity)
                .map(|_| AtomicPtr::new(ptr::null_mut()))
                .collect(),
            count: PaddedCount(AtomicUsize::new(0)),
            retries: AtomicU64::new(0),
        }
    }

    /// Rewind to empty, optionally overwriting storage with `T::default()`.
    ///
    /// Returns the number of slots that were reserved.
    pub(crate) fn clear(&mut self, zero: bool) -> usize {
        if zero {
            for cell in self.cells.iter_mut() {
                *cell.get_mut() = T::default();
            }
        }
        for entry in self.published.iter_mut() {
            *entry.get_mut() = ptr::null_mut();
        }
        std::mem::replace(self.count.0.get_mut(), 0)
    }

    /// Shared-reference variant of [`RawSlots::clear`].
    ///
    /// # Safety
    ///
    /// No reservation, write, or read may be in flight on any thread, and no
    /// reference previously returned by this table may be used afterwards.
    pub(crate) unsafe fn clear_shared(&self, zero: bool) -> usize {
        if zero {
            for cell in self.cells.iter() {
                // SAFETY: quiescence is guaranteed by the caller, so nothing
                // else reads or writes this cell.
                unsafe {
                    *cell.get() = T::default();
                }
            }
        }
        for entry in self.published.iter() {
            entry.store(ptr::null_mut(), Ordering::Release);
        }
        self.count.0.swap(0, Ordering::AcqRel)
    }
}

impl<T> RawSlots<T> {
    /// Total slot count.
    pub(crate) fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of reserved slots.
    pub(crate) fn len(&self) -> usize {
        self.count.0.load(Ordering::Acquire)
    }

    /// Cumulative lost compare-and-exchange attempts.
    pub(crate) fn retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Claim `n` contiguous slots.
    ///
    /// Capacity is checked before every exchange attempt, so the counter
    /// never exceeds capacity. On shortfall returns the last observed count.
    fn reserve(&self, n: usize) -> Result<Reservation<'_>, usize> {
        let capacity = self.capacity();
        let mut current = self.count.0.load(Ordering::Acquire);
        loop {
            let end = match current.checked_add(n) {
                Some(end) if end <= capacity => end,
                _ => return Err(current),
            };
            match self.count.0.compare_exchange_weak(
                current,
                end,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return Ok(Reservation {
                        count: &self.count.0,
                        start: current,
                        end,
                    })
                }
                Err(actual) => {
                    self.retries.fetch_add(1, Ordering::Relaxed);
                    current = actual;
                }
            }
        }
    }

    /// Reserve one slot, store `f()` into it, and publish it.
    ///
    /// `f` runs only after the slot is secured. On shortfall returns the
    /// observed count and `f` is never called. If `f` panics the slot is
    /// handed back (see [`Reservation`]).
    pub(crate) fn push_with<F>(&self, f: F) -> Result<(usize, &T), usize>
    where
        F: FnOnce() -> T,
    {
        let reservation = self.reserve(1)?;
        let index = reservation.start;
        let cell = self.cells[index].get();
        let value = f();
        // SAFETY: `reserve` handed `index` to this call alone and its table
        // entry is null, so no other thread reads or writes the cell. The
        // previous occupant is a valid `T` and is dropped here.
        unsafe {
            *cell = value;
        }
        reservation.commit();
        self.published[index].store(cell, Ordering::Release);
        // SAFETY: the cell is initialised and will not be written again until
        // the table is cleared, which outlives the `&self` borrow.
        Ok((index, unsafe { &*cell }))
    }

    /// Reserve `values.len()` contiguous slots, store the values in order,
    /// then publish each slot.
    ///
    /// Exactly `values.len()` items are consumed. On shortfall returns the
    /// observed count and `values` is dropped unconsumed.
    ///
    /// # Panics
    ///
    /// Panics if the iterator yields fewer items than it reported. On that
    /// panic, or one raised by the iterator itself, nothing is published and
    /// the range is handed back (see [`Reservation`]). Slots already written
    /// keep their new values as unpublished storage.
    pub(crate) fn extend<I>(&self, values: I) -> Result<(usize, &[T]), usize>
    where
        I: ExactSizeIterator<Item = T>,
    {
        let len = values.len();
        if len == 0 {
            return Ok((self.len(), &[]));
        }
        let reservation = self.reserve(len)?;
        let start = reservation.start;
        let cells = &self.cells[start..start + len];

        let mut written = 0;
        for (cell, value) in cells.iter().zip(values) {
            // SAFETY: `[start, start + len)` was handed to this call alone
            // and none of its entries are published yet.
            unsafe {
                *cell.get() = value;
            }
            written += 1;
        }
        assert_eq!(
            written, len,
            "ExactSizeIterator reported {len} items but yielded {written}"
        );
        reservation.commit();

        for (cell, entry) in cells.iter().zip(&self.published[start..start + len]) {
            entry.store(cell.get(), Ordering::Release);
        }

        // SAFETY: `UnsafeCell<T>` has the same layout as `T`. Every cell in
        // the range is initialised and immutable until the table is cleared.
        let values = unsafe { slice::from_raw_parts(cells.as_ptr().cast::<T>(), len) };
        Ok((start, values))
    }

    /// Acquire-load the published value at `index`.
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        let ptr = self.published.get(index)?.load(Ordering::Acquire);
        // SAFETY: non-null entries point into `cells` and were stored with
        // `Release` after the value write completed; this `Acquire` load makes
        // that write visible. The cell is not written again until the table
        // is cleared.
        unsafe { ptr.cast_const().as_ref() }
    }

    /// Exclusive access to a published value.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.published.get_mut(index)?.get_mut().is_null() {
            return None;
        }
        Some(self.cells[index].get_mut())
    }

    /// Every storage slot, reserved or not.
    pub(crate) fn storage(&mut self) -> &[T] {
        // SAFETY: `UnsafeCell<T>` has the same layout as `T`, every cell is
        // initialised, and `&mut self` excludes concurrent writers.
        unsafe { slice::from_raw_parts(self.cells.as_ptr().cast::<T>(), self.cells.len()) }
    }
}
