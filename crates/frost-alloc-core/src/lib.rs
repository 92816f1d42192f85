//! Core types and traits for the FROST memory subsystem.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the arena, heap and context
//! crates: byte addresses and identifiers, alignment arithmetic, error
//! types, and the [`RawSpace`] supplier trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod align;
pub mod error;
pub mod id;
pub mod traits;

pub use align::{align_up, is_aligned, DEFAULT_ALIGN};
pub use error::{ArenaError, ConfigError, ContextError, HeapError};
pub use id::{Addr, ArenaId, BlockId};
pub use traits::RawSpace;
