//! Arena configuration parameters.

use std::mem;
use std::sync::atomic::AtomicPtr;

use crate::error::ArenaError;

/// How [`AtomicArena::reset`](crate::AtomicArena::reset) reclaims slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResetMode {
    /// Rewind the reservation counter and clear the publication table.
    ///
    /// Storage is left untouched: stale values stay in memory (unreachable
    /// through the arena) until a later allocation overwrites them or the
    /// arena is dropped.
    #[default]
    Fast,
    /// Like [`ResetMode::Fast`], but every storage slot is first overwritten
    /// with `T::default()`, dropping the stale value immediately.
    ///
    /// Use this when elements may carry sensitive data or owned resources
    /// that must not linger between batches.
    Release,
}

/// Configuration for an [`AtomicArena`](crate::AtomicArena).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of element slots. Fixed for the arena's lifetime; must be
    /// positive.
    pub capacity: usize,

    /// Mode used by [`AtomicArena::reset`](crate::AtomicArena::reset).
    ///
    /// Default: [`ResetMode::Fast`].
    pub reset_mode: ResetMode,
}

impl ArenaConfig {
    /// Create a config for `capacity` slots with fast reset.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            reset_mode: ResetMode::default(),
        }
    }

    /// Set the default reset mode.
    pub fn with_reset_mode(mut self, reset_mode: ResetMode) -> Self {
        self.reset_mode = reset_mode;
        self
    }

    /// Bytes of element storage needed for `capacity` slots of `T`, or
    /// `None` on overflow.
    pub fn storage_bytes<T>(&self) -> Option<usize> {
        self.capacity.checked_mul(mem::size_of::<T>())
    }

    /// Bytes of storage plus publication table for `capacity` slots of `T`,
    /// or `None` on overflow.
    pub fn memory_bytes<T>(&self) -> Option<usize> {
        let table = self.capacity.checked_mul(mem::size_of::<AtomicPtr<T>>())?;
        self.storage_bytes::<T>()?.checked_add(table)
    }

    /// Check the config against element type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidConfig`] if `capacity` is zero or if the
    /// storage and publication table for `capacity` elements of `T` would
    /// exceed `isize::MAX` bytes.
    pub fn validate<T>(&self) -> Result<(), ArenaError> {
        if self.capacity == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "capacity must be positive".into(),
            });
        }
        match self.memory_bytes::<T>() {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(ArenaError::InvalidConfig {
                reason: format!(
                    "capacity {} of {}-byte elements exceeds the addressable size",
                    self.capacity,
                    mem::size_of::<T>(),
                ),
            }),
        }
    }
}
