//! Linear allocation over a fixed backing store.
//!
//! Provides the single owned byte region that every allocator in the
//! subsystem draws from, and the bump-pointer [`Arena`] with
//! stack-discipline release.
//!
//! # Architecture
//!
//! ```text
//! BackingStore (owned Box<[u8]>, base aligned to 64 bytes)
//! └── Arena × N (disjoint spans; start + capacity + bump cursor)
//! ```
//!
//! Arenas never hold a reference to the store. They are pure cursor
//! arithmetic over a span and hand out [`Addr`] offsets; the store
//! resolves those offsets to bytes. All code in this crate is safe Rust.
//!
//! [`Addr`]: frost_alloc_core::Addr

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod store;

pub use arena::{Arena, ArenaMark};
pub use store::BackingStore;
