//! Strongly-typed addresses and identifiers.

use std::fmt;

/// A byte offset into a backing store.
///
/// Every allocation in the subsystem is expressed as an `Addr` relative to
/// the start of the backing store that owns it, never as a raw pointer.
/// The owning store resolves an `Addr` to bytes on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Addr(pub usize);

impl Addr {
    /// The byte offset from the start of the backing store.
    pub fn offset(self) -> usize {
        self.0
    }

    /// Offset this address by `bytes`, returning `None` on overflow.
    pub fn checked_add(self, bytes: usize) -> Option<Addr> {
        self.0.checked_add(bytes).map(Addr)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Identifies an arena registered with an allocator context.
///
/// Assigned sequentially at creation and never reused within one context,
/// so a released arena's id cannot alias a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(pub u32);

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a block in a heap's block table.
///
/// `BlockId(n)` is the n-th block ever carved by that heap. Blocks are
/// never removed, so an id stays valid for the lifetime of the heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The block's position in the table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_displays_as_hex() {
        assert_eq!(Addr(0x40).to_string(), "0x40");
    }

    #[test]
    fn addr_checked_add_detects_overflow() {
        assert_eq!(Addr(8).checked_add(8), Some(Addr(16)));
        assert_eq!(Addr(usize::MAX).checked_add(1), None);
    }

    #[test]
    fn block_id_index_matches_value() {
        assert_eq!(BlockId(7).index(), 7);
    }
}
