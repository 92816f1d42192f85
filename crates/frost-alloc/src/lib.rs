//! FROST allocator: arena and heap allocation over one fixed backing region.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the allocator sub-crates. For most users, adding `frost-alloc` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use frost_alloc::prelude::*;
//!
//! let mut ctx = AllocatorContext::new(ContextConfig::new(4096)).unwrap();
//!
//! // Stack-like scratch memory.
//! let scratch = ctx.create_arena(256).unwrap();
//! let header = ctx.arena_push_zero(scratch, 16).unwrap();
//! assert!(ctx.bytes(header, 16).iter().all(|&b| b == 0));
//! ctx.arena_clear(scratch).unwrap();
//!
//! // Irregular lifetimes.
//! let buf = ctx.allocate(64).expect("heap has room");
//! ctx.bytes_mut(buf, 64).fill(0xAB);
//! ctx.release(buf);
//! assert_eq!(ctx.allocate(0), None);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `frost-alloc-core` | Addresses, ids, alignment, errors, `RawSpace` |
//! | [`arena`] | `frost-alloc-arena` | `BackingStore`, `Arena`, `ArenaMark` |
//! | [`heap`] | `frost-alloc-heap` | First-fit `Heap`, blocks, stats |
//! | [`context`] | `frost-alloc-context` | `AllocatorContext`, `ContextConfig` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Addresses, identifiers, alignment helpers and errors (`frost-alloc-core`).
pub use frost_alloc_core as types;

/// Backing store and bump arena (`frost-alloc-arena`).
pub use frost_alloc_arena as arena;

/// First-fit free-list heap (`frost-alloc-heap`).
pub use frost_alloc_heap as heap;

/// Allocator context and configuration (`frost-alloc-context`).
pub use frost_alloc_context as context;

/// Common imports for typical allocator usage.
///
/// ```rust
/// use frost_alloc::prelude::*;
/// ```
pub mod prelude {
    pub use frost_alloc_arena::{Arena, ArenaMark, BackingStore};
    pub use frost_alloc_context::{AllocatorContext, ContextConfig};
    pub use frost_alloc_core::{Addr, ArenaId, RawSpace, DEFAULT_ALIGN};
    pub use frost_alloc_core::{ArenaError, ConfigError, ContextError, HeapError};
    pub use frost_alloc_heap::{Heap, HeapStats};
}
