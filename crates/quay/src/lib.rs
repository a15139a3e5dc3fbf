//! Quay: lock-free fixed-capacity arenas for per-batch scratch storage.
//!
//! This is the top-level facade crate that re-exports the public API from the
//! Quay sub-crates. For most users, adding `quay` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use quay::prelude::*;
//!
//! // One buffer of 4 slots, allocated once.
//! let mut arena: AtomicArena<u32> = AtomicArena::new(4).unwrap();
//!
//! // Workers allocate through a shared reference.
//! std::thread::scope(|s| {
//!     s.spawn(|| {
//!         arena.alloc(7).unwrap();
//!     });
//!     s.spawn(|| {
//!         arena.append_slice([1, 2]).unwrap();
//!     });
//! });
//! assert_eq!(arena.len(), 3);
//!
//! // A run that does not fit is rejected as a whole.
//! let err = arena.append_slice([8, 9]).unwrap_err();
//! assert!(matches!(
//!     err,
//!     ArenaError::CapacityExceeded { requested: 2, remaining: 1, .. }
//! ));
//!
//! // Reclaim everything at once; handles cannot outlive this.
//! arena.reset();
//! assert!(arena.is_empty());
//! assert_eq!(arena.stats().generation, 1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `quay-arena` | `AtomicArena`, handles, config, errors, stats |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Fixed-capacity lock-free arena (`quay-arena`).
///
/// Most users only need [`arena::AtomicArena`] and its handle types from
/// this module; they are also available in the [`prelude`].
pub use quay_arena as arena;

/// Common imports for typical Quay usage.
///
/// ```rust
/// use quay::prelude::*;
/// ```
pub mod prelude {
    // Arena and handles
    pub use quay_arena::{AtomicArena, SliceRef, SlotRef};

    // Configuration
    pub use quay_arena::{ArenaConfig, ResetMode};

    // Errors and diagnostics
    pub use quay_arena::{ArenaError, ArenaStats};
}
