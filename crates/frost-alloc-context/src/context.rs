//! The allocator context: one backing store, one heap, many arenas.

use frost_alloc_arena::{Arena, ArenaMark, BackingStore};
use frost_alloc_core::{Addr, ArenaId, ContextError, HeapError};
use frost_alloc_heap::{Heap, HeapStats};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::ContextConfig;

/// The explicit state binding a heap and its arenas to a backing store.
///
/// Exactly one context governs a store: the store is created by and owned
/// by the context, so no second allocator can alias its bytes.
pub struct AllocatorContext {
    config: ContextConfig,
    store: BackingStore,
    heap: Heap<Arena>,
    /// Live arenas. Each span is an in-use heap block starting at
    /// `arena.start()`.
    arenas: IndexMap<ArenaId, Arena>,
    next_arena_id: u32,
}

impl AllocatorContext {
    /// Byte pattern written over released heap blocks when
    /// [`ContextConfig::poison_released`] is set.
    pub const POISON: u8 = 0xDD;

    /// Create a context with a freshly allocated backing store.
    pub fn new(config: ContextConfig) -> Result<Self, ContextError> {
        config.validate()?;
        let store = BackingStore::new(config.backing_size);
        let raw_space = Arena::over(&store, Addr(0), store.len())?;
        debug!(
            backing_size = config.backing_size,
            base_addr = store.base_addr(),
            "allocator context created"
        );
        Ok(Self {
            config,
            store,
            heap: Heap::new(raw_space),
            arenas: IndexMap::new(),
            next_arena_id: 0,
        })
    }

    /// Create a context over `backing_size` bytes with default settings.
    pub fn with_backing_size(backing_size: usize) -> Result<Self, ContextError> {
        Self::new(ContextConfig::new(backing_size))
    }

    // ── Arenas ─────────────────────────────────────────────────────

    /// Create an arena of exactly `capacity` bytes, backed by a heap block.
    pub fn create_arena(&mut self, capacity: usize) -> Result<ArenaId, ContextError> {
        if capacity == 0 {
            return Err(ContextError::ZeroCapacity);
        }
        if self.arenas.len() >= self.config.max_arenas {
            return Err(ContextError::TooManyArenas {
                max: self.config.max_arenas,
            });
        }
        let next = self
            .next_arena_id
            .checked_add(1)
            .ok_or(ContextError::TooManyArenas {
                max: self.config.max_arenas,
            })?;
        let start = self
            .heap
            .allocate(capacity)
            .ok_or(ContextError::OutOfMemory {
                requested: capacity,
            })?;
        let arena = Arena::over(&self.store, start, capacity)?;

        let id = ArenaId(self.next_arena_id);
        self.next_arena_id = next;
        self.arenas.insert(id, arena);
        debug!(%id, %start, capacity, "arena created");
        Ok(id)
    }

    /// Retire an arena and return its span to the heap.
    pub fn release_arena(&mut self, id: ArenaId) -> Result<(), ContextError> {
        let arena = self
            .arenas
            .swap_remove(&id)
            .ok_or(ContextError::UnknownArena(id))?;
        self.release(arena.start());
        debug!(%id, start = %arena.start(), "arena released");
        Ok(())
    }

    /// Look up a live arena.
    pub fn arena(&self, id: ArenaId) -> Option<&Arena> {
        self.arenas.get(&id)
    }

    /// Number of live arenas.
    pub fn arena_count(&self) -> usize {
        self.arenas.len()
    }

    /// Push `size` bytes onto an arena at 8-byte alignment.
    pub fn arena_push(&mut self, id: ArenaId, size: usize) -> Result<Addr, ContextError> {
        Ok(self.arena_mut(id)?.push(size)?)
    }

    /// Push `size` zeroed bytes onto an arena.
    pub fn arena_push_zero(&mut self, id: ArenaId, size: usize) -> Result<Addr, ContextError> {
        let arena = self
            .arenas
            .get_mut(&id)
            .ok_or(ContextError::UnknownArena(id))?;
        Ok(arena.push_zero(&mut self.store, size)?)
    }

    /// Push `size` bytes onto an arena at a caller-chosen alignment.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    pub fn arena_push_align(
        &mut self,
        id: ArenaId,
        size: usize,
        align: usize,
    ) -> Result<Addr, ContextError> {
        Ok(self.arena_mut(id)?.push_align(size, align)?)
    }

    /// Rewind an arena by exactly `size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds the arena's position.
    pub fn arena_pop(&mut self, id: ArenaId, size: usize) -> Result<(), ContextError> {
        self.arena_mut(id)?.pop(size);
        Ok(())
    }

    /// Rewind an arena by `size` bytes, reporting underflow as
    /// [`ArenaError::PopUnderflow`](frost_alloc_core::ArenaError::PopUnderflow)
    /// and leaving the arena unchanged.
    pub fn arena_try_pop(&mut self, id: ArenaId, size: usize) -> Result<(), ContextError> {
        Ok(self.arena_mut(id)?.try_pop(size)?)
    }

    /// Reset an arena's position to zero.
    pub fn arena_clear(&mut self, id: ArenaId) -> Result<(), ContextError> {
        self.arena_mut(id)?.clear();
        Ok(())
    }

    /// Record an arena's current position.
    pub fn arena_mark(&self, id: ArenaId) -> Result<ArenaMark, ContextError> {
        self.arena(id)
            .map(Arena::mark)
            .ok_or(ContextError::UnknownArena(id))
    }

    /// Rewind an arena to a recorded position.
    pub fn arena_reset_to(&mut self, id: ArenaId, mark: ArenaMark) -> Result<(), ContextError> {
        self.arena_mut(id)?.reset_to(mark);
        Ok(())
    }

    fn arena_mut(&mut self, id: ArenaId) -> Result<&mut Arena, ContextError> {
        self.arenas
            .get_mut(&id)
            .ok_or(ContextError::UnknownArena(id))
    }

    // ── Heap ───────────────────────────────────────────────────────

    /// Allocate at least `size` heap bytes; `None` when `size == 0` or the
    /// heap is exhausted.
    pub fn allocate(&mut self, size: usize) -> Option<Addr> {
        self.heap.allocate(size)
    }

    /// Like [`allocate`](Self::allocate), with the first `size` bytes zeroed.
    pub fn allocate_zeroed(&mut self, size: usize) -> Option<Addr> {
        let addr = self.heap.allocate(size)?;
        self.store.fill(addr, size, 0);
        Some(addr)
    }

    /// Return a heap block for reuse.
    ///
    /// Releasing a foreign or already-released address trips a debug
    /// assertion; release builds log it and leave the heap unchanged.
    pub fn release(&mut self, addr: Addr) {
        if let Err(err) = self.try_release(addr) {
            warn!(%err, "ignoring invalid heap release");
            debug_assert!(false, "{err}");
        }
    }

    /// Return a heap block for reuse, reporting contract violations.
    pub fn try_release(&mut self, addr: Addr) -> Result<(), HeapError> {
        if self.arenas.values().any(|arena| arena.start() == addr) {
            return Err(HeapError::ArenaBlock { addr });
        }
        let size = self.heap.try_release(addr)?;
        if self.config.poison_released {
            self.store.fill(addr, size, Self::POISON);
        }
        Ok(())
    }

    /// Heap occupancy counters.
    pub fn heap_stats(&self) -> HeapStats {
        self.heap.stats()
    }

    /// The heap, for inspection.
    pub fn heap(&self) -> &Heap<Arena> {
        &self.heap
    }

    // ── Memory access ──────────────────────────────────────────────

    /// Get a shared slice of the backing store.
    ///
    /// # Panics
    ///
    /// Panics if the span exceeds the store.
    pub fn bytes(&self, addr: Addr, len: usize) -> &[u8] {
        self.store.bytes(addr, len)
    }

    /// Get a mutable slice of the backing store.
    ///
    /// # Panics
    ///
    /// Panics if the span exceeds the store.
    pub fn bytes_mut(&mut self, addr: Addr, len: usize) -> &mut [u8] {
        self.store.bytes_mut(addr, len)
    }

    /// Machine address of `addr`.
    pub fn absolute_addr(&self, addr: Addr) -> usize {
        self.store.absolute_addr(addr)
    }

    /// Size of the backing store in bytes.
    pub fn backing_len(&self) -> usize {
        self.store.len()
    }

    /// The configuration this context was built with.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_alloc_core::{ArenaError, ConfigError};
    use frost_alloc_test_utils::{assert_disjoint, init_tracing};

    fn ctx(size: usize) -> AllocatorContext {
        init_tracing();
        AllocatorContext::with_backing_size(size).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let err = AllocatorContext::with_backing_size(0).err();
        assert_eq!(err, Some(ContextError::Config(ConfigError::ZeroBackingSize)));
    }

    #[test]
    fn arena_span_is_a_heap_block() {
        let mut ctx = ctx(1024);
        let id = ctx.create_arena(100).unwrap();
        let arena = ctx.arena(id).unwrap();
        assert_eq!(arena.capacity(), 100);
        assert_eq!(ctx.heap().block_size(arena.start()), Some(104));
        assert_eq!(ctx.heap_stats().in_use_bytes, 104);
    }

    #[test]
    fn arena_and_heap_allocations_are_disjoint() {
        let mut ctx = ctx(1024);
        let h1 = ctx.allocate(24).unwrap();
        let id = ctx.create_arena(64).unwrap();
        let h2 = ctx.allocate(16).unwrap();
        let a1 = ctx.arena_push(id, 40).unwrap();
        let a2 = ctx.arena_push(id, 24).unwrap();
        assert!(ctx.arena(id).unwrap().contains(a2));
        assert_disjoint(&[(h1, 24), (h2, 16), (a1, 40), (a2, 24)]);
    }

    #[test]
    fn create_arena_zero_capacity_rejected() {
        let mut ctx = ctx(256);
        assert_eq!(ctx.create_arena(0), Err(ContextError::ZeroCapacity));
    }

    #[test]
    fn create_arena_beyond_backing_is_out_of_memory() {
        let mut ctx = ctx(256);
        assert_eq!(
            ctx.create_arena(512),
            Err(ContextError::OutOfMemory { requested: 512 })
        );
        assert_eq!(ctx.arena_count(), 0);
    }

    #[test]
    fn arena_limit_enforced() {
        init_tracing();
        let mut ctx = AllocatorContext::new(ContextConfig {
            max_arenas: 2,
            ..ContextConfig::new(1024)
        })
        .unwrap();
        ctx.create_arena(8).unwrap();
        let second = ctx.create_arena(8).unwrap();
        assert_eq!(
            ctx.create_arena(8),
            Err(ContextError::TooManyArenas { max: 2 })
        );
        ctx.release_arena(second).unwrap();
        assert!(ctx.create_arena(8).is_ok());
    }

    #[test]
    fn release_arena_recycles_its_block() {
        let mut ctx = ctx(128);
        let id = ctx.create_arena(128).unwrap();
        assert_eq!(ctx.allocate(8), None);
        ctx.release_arena(id).unwrap();
        assert!(ctx.arena(id).is_none());
        assert_eq!(ctx.arena_push(id, 8), Err(ContextError::UnknownArena(id)));
        assert!(ctx.allocate(8).is_some());
    }

    #[test]
    fn arena_ids_are_not_reused() {
        let mut ctx = ctx(1024);
        let a = ctx.create_arena(16).unwrap();
        ctx.release_arena(a).unwrap();
        let b = ctx.create_arena(16).unwrap();
        assert_ne!(a, b);
        assert_eq!(
            ctx.release_arena(a),
            Err(ContextError::UnknownArena(a))
        );
    }

    #[test]
    fn arena_exhaustion_is_reported() {
        let mut ctx = ctx(256);
        let id = ctx.create_arena(16).unwrap();
        ctx.arena_push(id, 16).unwrap();
        assert_eq!(
            ctx.arena_push(id, 1),
            Err(ContextError::Arena(ArenaError::Exhausted {
                requested: 1,
                pos: 16,
                capacity: 16
            }))
        );
    }

    #[test]
    fn arena_try_pop_reports_underflow() {
        let mut ctx = ctx(256);
        let id = ctx.create_arena(64).unwrap();
        ctx.arena_push(id, 8).unwrap();
        assert_eq!(
            ctx.arena_try_pop(id, 16),
            Err(ContextError::Arena(ArenaError::PopUnderflow {
                requested: 16,
                pos: 8
            }))
        );
        assert_eq!(ctx.arena(id).unwrap().pos(), 8);
        assert_eq!(ctx.arena_try_pop(id, 8), Ok(()));
        assert_eq!(ctx.arena(id).unwrap().pos(), 0);
        assert_eq!(
            ctx.arena_try_pop(ArenaId(99), 0),
            Err(ContextError::UnknownArena(ArenaId(99)))
        );
    }

    #[test]
    fn arena_mark_round_trip() {
        let mut ctx = ctx(256);
        let id = ctx.create_arena(128).unwrap();
        ctx.arena_push(id, 16).unwrap();
        let mark = ctx.arena_mark(id).unwrap();
        ctx.arena_push(id, 64).unwrap();
        ctx.arena_reset_to(id, mark).unwrap();
        assert_eq!(ctx.arena(id).unwrap().pos(), 16);
    }

    #[test]
    fn allocate_zeroed_clears_reused_block() {
        let mut ctx = ctx(256);
        let p = ctx.allocate(32).unwrap();
        ctx.bytes_mut(p, 32).fill(0x5A);
        ctx.release(p);
        let q = ctx.allocate_zeroed(32).unwrap();
        assert_eq!(q, p);
        assert!(ctx.bytes(q, 32).iter().all(|&b| b == 0));
    }

    #[test]
    fn poison_fills_released_blocks() {
        init_tracing();
        let mut ctx = AllocatorContext::new(ContextConfig {
            poison_released: true,
            ..ContextConfig::new(256)
        })
        .unwrap();
        let p = ctx.allocate(12).unwrap();
        ctx.bytes_mut(p, 12).fill(1);
        ctx.release(p);
        assert!(ctx
            .bytes(p, 16)
            .iter()
            .all(|&b| b == AllocatorContext::POISON));
    }

    #[test]
    fn try_release_refuses_live_arena_block() {
        let mut ctx = ctx(256);
        let id = ctx.create_arena(32).unwrap();
        let start = ctx.arena(id).unwrap().start();
        assert_eq!(
            ctx.try_release(start),
            Err(HeapError::ArenaBlock { addr: start })
        );
        assert_eq!(ctx.heap().block_size(start), Some(32));
    }

    #[test]
    fn try_release_reports_foreign_address() {
        let mut ctx = ctx(256);
        assert_eq!(
            ctx.try_release(Addr(64)),
            Err(HeapError::UnknownAddress { addr: Addr(64) })
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Alloc(usize),
            Release(usize),
            CreateArena(usize),
            ReleaseArena(usize),
            Push(usize, usize),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1usize..64).prop_map(Op::Alloc),
                any::<usize>().prop_map(Op::Release),
                (1usize..128).prop_map(Op::CreateArena),
                any::<usize>().prop_map(Op::ReleaseArena),
                (any::<usize>(), 0usize..32).prop_map(|(a, n)| Op::Push(a, n)),
            ]
        }

        proptest! {
            #[test]
            fn heap_blocks_and_arena_spans_stay_disjoint(
                ops in proptest::collection::vec(arb_op(), 1..120),
            ) {
                let mut ctx = ctx(4096);
                let mut blocks: Vec<(Addr, usize)> = Vec::new();
                let mut arenas: Vec<ArenaId> = Vec::new();
                for op in ops {
                    match op {
                        Op::Alloc(size) => {
                            if let Some(addr) = ctx.allocate(size) {
                                blocks.push((addr, size));
                            }
                        }
                        Op::Release(pick) if !blocks.is_empty() => {
                            let (addr, _) = blocks.swap_remove(pick % blocks.len());
                            ctx.release(addr);
                        }
                        Op::CreateArena(capacity) => match ctx.create_arena(capacity) {
                            Ok(id) => arenas.push(id),
                            Err(err) => {
                                let expected = matches!(
                                    err,
                                    ContextError::OutOfMemory { .. }
                                        | ContextError::TooManyArenas { .. }
                                );
                                prop_assert!(expected, "unexpected create_arena error: {:?}", err);
                            }
                        },
                        Op::ReleaseArena(pick) if !arenas.is_empty() => {
                            let id = arenas.swap_remove(pick % arenas.len());
                            prop_assert!(ctx.release_arena(id).is_ok());
                        }
                        Op::Push(pick, size) if !arenas.is_empty() => {
                            let id = arenas[pick % arenas.len()];
                            if let Ok(addr) = ctx.arena_push(id, size) {
                                prop_assert!(ctx.arena(id).unwrap().contains(addr) || size == 0);
                            }
                        }
                        Op::Release(_) | Op::ReleaseArena(_) | Op::Push(..) => {}
                    }
                    let mut spans = blocks.clone();
                    spans.extend(arenas.iter().map(|&id| {
                        let arena = ctx.arena(id).unwrap();
                        (arena.start(), arena.capacity())
                    }));
                    assert_disjoint(&spans);
                    prop_assert!(spans.iter().all(|&(a, len)| a.offset() + len <= ctx.backing_len()));
                }
            }
        }
    }
}
