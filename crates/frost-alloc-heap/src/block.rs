//! Heap block descriptors.

use frost_alloc_core::{Addr, BlockId};

/// Whether a block is held by a caller or waiting on the free list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockState {
    /// Returned by `allocate` and not yet released.
    InUse,
    /// Released and linked into the free list.
    Free,
}

/// One entry in the heap's block table.
///
/// `size` is the usable payload, fixed when the block is carved; reuse
/// for a smaller request keeps the full size.
#[derive(Clone, Debug)]
pub struct Block {
    pub(crate) addr: Addr,
    pub(crate) size: usize,
    pub(crate) state: BlockState,
    /// Next block on the free list. Only meaningful while `Free`.
    pub(crate) next_free: Option<BlockId>,
}

impl Block {
    pub(crate) fn carved(addr: Addr, size: usize) -> Self {
        Self {
            addr,
            size,
            state: BlockState::InUse,
            next_free: None,
        }
    }

    /// Payload start.
    pub fn addr(&self) -> Addr {
        self.addr
    }

    /// Usable payload bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current state.
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Whether the block is held by a caller.
    pub fn is_in_use(&self) -> bool {
        self.state == BlockState::InUse
    }
}
