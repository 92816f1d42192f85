//! Explicit allocator state for one backing store.
//!
//! An [`AllocatorContext`] is created once at startup and threaded to
//! every call site; there is no process-wide allocator singleton. It owns
//! the [`BackingStore`](frost_alloc_arena::BackingStore), one heap whose
//! raw space is an arena spanning the whole store, and any number of
//! arenas whose spans are heap blocks.
//!
//! ```text
//! AllocatorContext
//! ├── BackingStore (fixed, exclusively owned)
//! ├── Heap<Arena> (first-fit free list; raw space = whole-store arena)
//! └── IndexMap<ArenaId, Arena> (each span carved from the heap)
//! ```
//!
//! The context is single-threaded: every operation takes `&mut self`.
//! Callers sharing it with an interrupt handler or another task must
//! serialize access themselves.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;

pub use config::ContextConfig;
pub use context::AllocatorContext;
