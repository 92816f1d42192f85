//! First-fit free-list heap.
//!
//! [`Heap`] serves irregular-lifetime allocations. Released blocks are
//! pushed on the head of a singly linked free list and reused first-fit
//! in list order; only when nothing on the list is large enough does the
//! heap carve a fresh block from its [`RawSpace`].
//!
//! Adjacent free blocks are not coalesced and reused blocks are not
//! split, so a workload that releases many small blocks and then asks
//! for large ones can exhaust the raw space while free bytes remain.

use frost_alloc_core::{align_up, Addr, BlockId, HeapError, RawSpace, DEFAULT_ALIGN};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::block::{Block, BlockState};

/// Point-in-time heap occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Sum of all block sizes ever carved.
    pub carved_bytes: usize,
    /// Bytes in blocks currently held by callers.
    pub in_use_bytes: usize,
    /// Bytes in blocks on the free list.
    pub free_bytes: usize,
    /// Number of blocks carved.
    pub blocks: usize,
    /// Number of blocks on the free list.
    pub free_blocks: usize,
}

/// A general-purpose allocator over a fixed raw-space supplier.
///
/// Every address returned by [`allocate`](Heap::allocate) is 8-byte
/// aligned (relative to the supplier's origin) and distinct from every
/// other block currently in use.
pub struct Heap<S> {
    /// Supplier of never-used bytes.
    source: S,
    /// All blocks ever carved, indexed by `BlockId`.
    blocks: Vec<Block>,
    /// Maps a block's payload address to its id, for release.
    by_addr: IndexMap<Addr, BlockId>,
    /// Head of the free list.
    free_head: Option<BlockId>,
    stats: HeapStats,
}

impl<S: RawSpace> Heap<S> {
    /// Create an empty heap that carves from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            blocks: Vec::new(),
            by_addr: IndexMap::new(),
            free_head: None,
            stats: HeapStats::default(),
        }
    }

    /// Allocate at least `size` bytes.
    ///
    /// Returns `None` for a zero-size request and when neither the free
    /// list nor the raw space can satisfy the request. Neither case is an
    /// error; callers check the result before use.
    pub fn allocate(&mut self, size: usize) -> Option<Addr> {
        if size == 0 {
            trace!("zero-size heap request");
            return None;
        }
        let Some(rounded) = align_up(size, DEFAULT_ALIGN) else {
            debug!(size, "heap request overflows");
            return None;
        };

        if let Some(id) = self.take_first_fit(rounded) {
            let block = &self.blocks[id.index()];
            trace!(%id, addr = %block.addr, size, block_size = block.size, "heap reuse");
            return Some(block.addr);
        }

        self.carve(rounded)
    }

    /// Return a block to the free list.
    ///
    /// Releasing an address this heap never returned, or one already
    /// released, is a caller bug: it trips a debug assertion, and in
    /// release builds is logged and ignored.
    pub fn release(&mut self, addr: Addr) {
        if let Err(err) = self.try_release(addr) {
            warn!(%err, "ignoring invalid heap release");
            debug_assert!(false, "{err}");
        }
    }

    /// Return a block to the free list, reporting contract violations.
    ///
    /// On success yields the released block's usable size. On error the
    /// heap is unchanged.
    pub fn try_release(&mut self, addr: Addr) -> Result<usize, HeapError> {
        let id = *self
            .by_addr
            .get(&addr)
            .ok_or(HeapError::UnknownAddress { addr })?;
        let block = &mut self.blocks[id.index()];
        if block.state == BlockState::Free {
            return Err(HeapError::DoubleRelease { addr });
        }
        block.state = BlockState::Free;
        block.next_free = self.free_head;
        let size = block.size;
        self.free_head = Some(id);

        self.stats.in_use_bytes -= size;
        self.stats.free_bytes += size;
        self.stats.free_blocks += 1;
        trace!(%id, %addr, size, "heap release");
        Ok(size)
    }

    /// Usable size of the in-use block starting at `addr`.
    pub fn block_size(&self, addr: Addr) -> Option<usize> {
        let id = self.by_addr.get(&addr)?;
        let block = &self.blocks[id.index()];
        block.is_in_use().then_some(block.size)
    }

    /// Whether `addr` is the start of a block this heap carved.
    pub fn owns(&self, addr: Addr) -> bool {
        self.by_addr.contains_key(&addr)
    }

    /// Current occupancy counters.
    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// Number of blocks on the free list, found by walking it.
    pub fn free_list_len(&self) -> usize {
        self.free_list().count()
    }

    /// Free blocks in list (search) order.
    pub fn free_list(&self) -> impl Iterator<Item = &Block> + '_ {
        std::iter::successors(self.free_head, |id| self.blocks[id.index()].next_free)
            .map(|id| &self.blocks[id.index()])
    }

    /// Every block ever carved, in carve order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (BlockId(i as u32), block))
    }

    /// The raw-space supplier.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unlink and claim the first free block of at least `size` bytes.
    fn take_first_fit(&mut self, size: usize) -> Option<BlockId> {
        let mut prev: Option<BlockId> = None;
        let mut cursor = self.free_head;
        while let Some(id) = cursor {
            let block = &self.blocks[id.index()];
            let next = block.next_free;
            if block.size >= size {
                match prev {
                    None => self.free_head = next,
                    Some(p) => self.blocks[p.index()].next_free = next,
                }
                let block = &mut self.blocks[id.index()];
                block.state = BlockState::InUse;
                block.next_free = None;
                let claimed = block.size;

                self.stats.in_use_bytes += claimed;
                self.stats.free_bytes -= claimed;
                self.stats.free_blocks -= 1;
                return Some(id);
            }
            prev = cursor;
            cursor = next;
        }
        None
    }

    /// Carve a fresh in-use block from the raw space.
    fn carve(&mut self, size: usize) -> Option<Addr> {
        let Ok(raw_id) = u32::try_from(self.blocks.len()) else {
            debug!(size, "heap block table full");
            return None;
        };
        let Some(addr) = self.source.carve(size, DEFAULT_ALIGN) else {
            debug!(
                size,
                remaining = self.source.remaining(),
                free_blocks = self.stats.free_blocks,
                "heap exhausted"
            );
            return None;
        };
        let id = BlockId(raw_id);
        self.blocks.push(Block::carved(addr, size));
        self.by_addr.insert(addr, id);

        self.stats.carved_bytes += size;
        self.stats.in_use_bytes += size;
        self.stats.blocks += 1;
        trace!(%id, %addr, size, "heap carve");
        Some(addr)
    }
}
