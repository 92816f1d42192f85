//! Error types for the FROST memory subsystem, organized by component:
//! arena, heap, allocator context and configuration.
//!
//! Exhaustion is always a returned value. Contract violations that are
//! cheap to detect get their own variants so callers and tests can see
//! them, but the infallible entry points treat them as programmer errors.

use thiserror::Error;

use crate::id::{Addr, ArenaId};

/// Errors from arena operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The bump cursor cannot advance by the requested size without
    /// passing the arena's capacity.
    #[error("arena exhausted: requested {requested} bytes at position {pos}, capacity {capacity}")]
    Exhausted {
        /// Number of bytes requested.
        requested: usize,
        /// The (aligned) cursor the request would have started at.
        pos: usize,
        /// Total capacity of the arena.
        capacity: usize,
    },
    /// A pop asked to rewind further than the current position.
    #[error("arena pop underflow: popping {requested} bytes from position {pos}")]
    PopUnderflow {
        /// Number of bytes the caller tried to pop.
        requested: usize,
        /// Position at the time of the pop.
        pos: usize,
    },
    /// The requested span does not fit inside the backing store.
    #[error("arena span {start}+{capacity} lies outside a {store_len}-byte backing store")]
    OutOfBounds {
        /// First byte of the requested span.
        start: Addr,
        /// Requested span length.
        capacity: usize,
        /// Length of the backing store.
        store_len: usize,
    },
    /// The requested span does not start on an 8-byte boundary.
    #[error("arena start {start} is not 8-byte aligned")]
    Misaligned {
        /// First byte of the requested span.
        start: Addr,
    },
}

/// Contract violations detected by the heap's release path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The address was never returned by this heap's `allocate`.
    #[error("address {addr} was not allocated by this heap")]
    UnknownAddress {
        /// The offending address.
        addr: Addr,
    },
    /// The block at this address is already on the free list.
    #[error("double release of block at {addr}")]
    DoubleRelease {
        /// The offending address.
        addr: Addr,
    },
    /// The block is the span of a live arena; release the arena instead.
    #[error("block at {addr} backs a live arena")]
    ArenaBlock {
        /// The offending address.
        addr: Addr,
    },
}

/// Errors from allocator context configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The backing store must hold at least one byte.
    #[error("backing size must be non-zero")]
    ZeroBackingSize,
    /// At least one arena slot is required.
    #[error("max_arenas must be non-zero")]
    ZeroMaxArenas,
}

/// Errors surfaced by the allocator context.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The heap could not supply the bytes backing a new arena.
    #[error("out of memory: could not supply {requested} bytes")]
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
    /// An arena must have a non-zero capacity.
    #[error("arena capacity must be non-zero")]
    ZeroCapacity,
    /// The context already holds its maximum number of arenas.
    #[error("arena limit reached: {max} arenas")]
    TooManyArenas {
        /// The configured arena limit.
        max: usize,
    },
    /// No live arena has this id.
    #[error("unknown arena {0}")]
    UnknownArena(ArenaId),
    /// An arena operation failed.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// The context configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
