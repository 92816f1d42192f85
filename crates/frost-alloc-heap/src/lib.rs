//! General-purpose allocate/release over a fixed raw-space supplier.
//!
//! The [`Heap`] carves blocks from any [`RawSpace`] (normally an arena
//! spanning a backing store) and recycles released blocks through a
//! singly linked free list. Block metadata lives in a side table indexed
//! by [`BlockId`], never inside the allocated bytes.
//!
//! # Block lifecycle
//!
//! ```text
//! unallocated space ──carve──▶ InUse ──release──▶ Free
//!                                ▲                  │
//!                                └──── first-fit ───┘
//! ```
//!
//! A block never returns to unallocated space.
//!
//! [`RawSpace`]: frost_alloc_core::RawSpace
//! [`BlockId`]: frost_alloc_core::BlockId

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod heap;

pub use block::{Block, BlockState};
pub use heap::{Heap, HeapStats};
