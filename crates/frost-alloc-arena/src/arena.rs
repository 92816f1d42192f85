//! Bump-pointer arena over a span of a backing store.
//!
//! An [`Arena`] owns a contiguous span `[start, start + capacity)` of a
//! [`BackingStore`] and a cursor `pos` that only moves by push, pop or
//! clear. Pushes are O(1), never block, and report exhaustion as an
//! [`ArenaError`] rather than panicking.

use frost_alloc_core::{align_up, is_aligned, Addr, ArenaError, RawSpace, DEFAULT_ALIGN};
use tracing::trace;

use crate::store::BackingStore;

/// A saved arena position, restored with [`Arena::reset_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct ArenaMark(usize);

impl ArenaMark {
    /// The position recorded by this mark.
    pub fn pos(self) -> usize {
        self.0
    }
}

/// A linear allocator with stack-discipline release.
///
/// Every address an arena returns lies inside its span and is not issued
/// again until a pop, reset or clear retires it. Clearing does not wipe
/// the bytes; only [`push_zero`](Arena::push_zero) guarantees contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    /// First byte of the span within the backing store.
    start: Addr,
    /// Machine address of `start`, used for absolute alignment.
    origin: usize,
    /// Span length. Fixed at creation.
    capacity: usize,
    /// Bump pointer: next free offset relative to `start`.
    pos: usize,
}

impl Arena {
    /// Bind a new arena to `[start, start + capacity)` of `store`.
    ///
    /// The caller is responsible for not binding two live arenas to
    /// overlapping spans; the allocator context does this by carving each
    /// arena's span from its heap.
    ///
    /// `start` must be 8-byte aligned so that default pushes land on
    /// multiples of 8 both within the arena and in the machine.
    pub fn over(store: &BackingStore, start: Addr, capacity: usize) -> Result<Self, ArenaError> {
        if !is_aligned(start.offset(), DEFAULT_ALIGN) {
            return Err(ArenaError::Misaligned { start });
        }
        if !store.contains_span(start, capacity) {
            return Err(ArenaError::OutOfBounds {
                start,
                capacity,
                store_len: store.len(),
            });
        }
        Ok(Self {
            start,
            origin: store.absolute_addr(start),
            capacity,
            pos: 0,
        })
    }

    /// Bump-allocate `size` bytes at the default 8-byte alignment.
    pub fn push(&mut self, size: usize) -> Result<Addr, ArenaError> {
        self.push_align(size, DEFAULT_ALIGN)
    }

    /// Like [`push`](Arena::push), with the returned bytes zeroed.
    ///
    /// `store` must be the store this arena was created over.
    pub fn push_zero(&mut self, store: &mut BackingStore, size: usize) -> Result<Addr, ArenaError> {
        debug_assert_eq!(
            store.absolute_addr(self.start),
            self.origin,
            "arena used with a foreign backing store"
        );
        let addr = self.push(size)?;
        store.fill(addr, size, 0);
        Ok(addr)
    }

    /// Bump-allocate `size` bytes whose machine address is a multiple of
    /// `align`.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    pub fn push_align(&mut self, size: usize, align: usize) -> Result<Addr, ArenaError> {
        let exhausted = |pos| ArenaError::Exhausted {
            requested: size,
            pos,
            capacity: self.capacity,
        };
        // origin + pos is inside the store, so only the round-up can overflow.
        let cursor = self.origin + self.pos;
        let aligned_pos = align_up(cursor, align)
            .map(|aligned| aligned - self.origin)
            .ok_or_else(|| exhausted(self.pos))?;
        let end = aligned_pos
            .checked_add(size)
            .filter(|&end| end <= self.capacity)
            .ok_or_else(|| exhausted(aligned_pos))?;
        self.pos = end;
        let addr = Addr(self.start.offset() + aligned_pos);
        trace!(%addr, size, align, pos = self.pos, "arena push");
        Ok(addr)
    }

    /// Rewind the cursor by exactly `size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds the current position. Rewinding past zero
    /// would let the next push hand out memory outside the arena.
    pub fn pop(&mut self, size: usize) {
        if let Err(err) = self.try_pop(size) {
            panic!("{err}");
        }
    }

    /// Rewind the cursor by `size` bytes, or report underflow and leave
    /// the arena unchanged.
    pub fn try_pop(&mut self, size: usize) -> Result<(), ArenaError> {
        if size > self.pos {
            return Err(ArenaError::PopUnderflow {
                requested: size,
                pos: self.pos,
            });
        }
        self.pos -= size;
        trace!(size, pos = self.pos, "arena pop");
        Ok(())
    }

    /// Reset the bump pointer to zero without touching the bytes.
    pub fn clear(&mut self) {
        self.pos = 0;
    }

    /// Record the current position.
    pub fn mark(&self) -> ArenaMark {
        ArenaMark(self.pos)
    }

    /// Rewind to a previously recorded position, retiring everything
    /// pushed since.
    ///
    /// # Panics
    ///
    /// Panics if the mark lies beyond the current position, i.e. the
    /// arena was popped or cleared below it.
    pub fn reset_to(&mut self, mark: ArenaMark) {
        assert!(
            mark.0 <= self.pos,
            "arena mark {} is ahead of position {}",
            mark.0,
            self.pos
        );
        self.pos = mark.0;
    }

    /// First byte of the arena's span.
    pub fn start(&self) -> Addr {
        self.start
    }

    /// Total span length in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current bump offset relative to [`start`](Arena::start).
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes between the cursor and the end of the span.
    pub fn remaining(&self) -> usize {
        self.capacity - self.pos
    }

    /// Whether `addr` falls inside this arena's span.
    pub fn contains(&self, addr: Addr) -> bool {
        addr >= self.start && addr.offset() - self.start.offset() < self.capacity
    }
}

impl RawSpace for Arena {
    fn carve(&mut self, size: usize, align: usize) -> Option<Addr> {
        self.push_align(size, align).ok()
    }

    fn remaining(&self) -> usize {
        Arena::remaining(self)
    }

    fn capacity(&self) -> usize {
        Arena::capacity(self)
    }
}
