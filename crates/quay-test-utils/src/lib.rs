//! Test utilities for quay development.
//!
//! Provides concurrent drivers ([`alloc_until_full`], [`append_until_full`],
//! [`mixed_until_full`], [`read_while_filling`]) that hammer an
//! [`AtomicArena`](quay_arena::AtomicArena) from many threads and record
//! every claim, plus fixture element types ([`Block`], [`DropProbe`]) whose
//! state is observable from tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod harness;

pub use fixtures::{tag, untag, Block, DropProbe, BLOCK_WORDS};
pub use harness::{
    alloc_until_full, append_until_full, mixed_until_full, read_while_filling, Claim, ClaimLog,
    ReadReport,
};
