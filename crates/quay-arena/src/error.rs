//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Not enough free slots remain to satisfy the reservation.
    ///
    /// No slot was reserved and no value was stored.
    CapacityExceeded {
        /// Number of slots requested.
        requested: usize,
        /// Free slots observed when the request was rejected.
        remaining: usize,
        /// Fixed slot capacity of the arena.
        capacity: usize,
    },
    /// The arena configuration failed validation at construction.
    InvalidConfig {
        /// Human-readable description of the rejected parameter.
        reason: String,
    },
}

impl ArenaError {
    /// Whether this error is a capacity shortfall (as opposed to a
    /// construction-time configuration error).
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                remaining,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} slots, \
                     {remaining} of {capacity} remaining"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
