//! Fixed-capacity, lock-free bump arena.
//!
//! Hands out stable storage for values of one element type from a buffer
//! allocated once at construction. Any number of threads may allocate
//! concurrently without locks; there is no per-value free, only an O(1)
//! bulk reset. This crate is the only one in the workspace that contains
//! `unsafe` code, all of it confined to `raw.rs`.
//!
//! # Architecture
//!
//! ```text
//! AtomicArena<T>
//! ├── RawSlots<T>
//! │   ├── cells: [UnsafeCell<T>; capacity]      (T::default() at construction)
//! │   ├── published: [AtomicPtr<T>; capacity]   (null until written)
//! │   └── count: AtomicUsize                    (cache-line padded)
//! ├── ArenaConfig (capacity, reset mode)
//! └── counters (generation, high-water mark, rejections)
//! ```
//!
//! # Operations
//!
//! - **alloc:** reserve one slot by compare-and-exchange, write, publish.
//! - **append_slice:** reserve a contiguous run as a unit, write, publish.
//! - **reset:** rewind the counter and clear the table; optionally zero
//!   storage ([`ResetMode::Release`]).
//!
//! Reset takes `&mut self`, so handles cannot outlive it and no allocation
//! can race it. Shared owners that coordinate quiescence themselves may use
//! the `unsafe` [`AtomicArena::reset_unsynchronized`] instead.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
mod raw;
pub mod stats;

// Public re-exports for the primary API surface.
pub use arena::{AtomicArena, Iter};
pub use config::{ArenaConfig, ResetMode};
pub use error::ArenaError;
pub use handle::{SliceRef, SlotRef, Slots};
pub use stats::ArenaStats;
