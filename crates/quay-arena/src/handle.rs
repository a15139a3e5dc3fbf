//! Handles to published slots.
//!
//! A [`SlotRef`] is returned by single allocations and a [`SliceRef`] by bulk
//! appends. Both borrow the arena, so the borrow checker rejects any
//! `reset(&mut self)` while a handle is alive.

use std::fmt;
use std::ops::{Deref, Range};
use std::slice;

/// Handle to one published value.
///
/// Carries the slot index alongside the reference so callers can correlate
/// values with arena positions. Cheap to copy.
pub struct SlotRef<'a, T> {
    index: usize,
    value: &'a T,
}

impl<'a, T> SlotRef<'a, T> {
    pub(crate) fn new(index: usize, value: &'a T) -> Self {
        Self { index, value }
    }

    /// Slot index within the arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The stored value, with the arena's lifetime.
    pub fn get(&self) -> &'a T {
        self.value
    }
}

impl<T> Clone for SlotRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotRef<'_, T> {}

impl<T> Deref for SlotRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotRef")
            .field("index", &self.index)
            .field("value", self.value)
            .finish()
    }
}

impl<T: PartialEq> PartialEq for SlotRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.value == other.value
    }
}

impl<T: Eq> Eq for SlotRef<'_, T> {}

/// Handle to a contiguous run of values published by one bulk append.
///
/// Derefs to the values as a slice, in input order. [`SliceRef::iter`]
/// yields the per-slot [`SlotRef`]s.
pub struct SliceRef<'a, T> {
    start: usize,
    values: &'a [T],
}

impl<'a, T> SliceRef<'a, T> {
    pub(crate) fn new(start: usize, values: &'a [T]) -> Self {
        Self { start, values }
    }

    /// Index of the first slot in the run.
    ///
    /// For an empty run this is the reservation count observed at the call.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The half-open range of slot indices covered by the run.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.start + self.values.len()
    }

    /// The stored values, with the arena's lifetime.
    pub fn as_slice(&self) -> &'a [T] {
        self.values
    }

    /// Handle for the `offset`-th value of the run.
    pub fn slot(&self, offset: usize) -> Option<SlotRef<'a, T>> {
        self.values
            .get(offset)
            .map(|value| SlotRef::new(self.start + offset, value))
    }

    /// Per-slot handles in input order.
    pub fn iter(&self) -> Slots<'a, T> {
        Slots {
            next_index: self.start,
            values: self.values.iter(),
        }
    }
}

impl<T> Clone for SliceRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SliceRef<'_, T> {}

impl<T> Deref for SliceRef<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.values
    }
}

impl<T: fmt::Debug> fmt::Debug for SliceRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceRef")
            .field("indices", &self.indices())
            .field("values", &self.values)
            .finish()
    }
}

impl<'a, T> IntoIterator for SliceRef<'a, T> {
    type Item = SlotRef<'a, T>;
    type IntoIter = Slots<'a, T>;

    fn into_iter(self) -> Slots<'a, T> {
        self.iter()
    }
}

/// Iterator over the [`SlotRef`]s of a [`SliceRef`].
pub struct Slots<'a, T> {
    next_index: usize,
    values: slice::Iter<'a, T>,
}

impl<'a, T> Iterator for Slots<'a, T> {
    type Item = SlotRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.values.next()?;
        let index = self.next_index;
        self.next_index += 1;
        Some(SlotRef::new(index, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> ExactSizeIterator for Slots<'_, T> {}
