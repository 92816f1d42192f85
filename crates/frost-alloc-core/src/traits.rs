//! Core abstraction traits.

use crate::id::Addr;

/// A supplier of never-before-issued raw bytes.
///
/// The heap carves new blocks from a `RawSpace` when its free list has
/// nothing suitable. Implementors hand out monotonically, never reissuing
/// a byte range while the consumer holds it; the heap never gives bytes
/// back, so `carve` is the only mutating operation.
pub trait RawSpace {
    /// Carve `size` bytes whose start is aligned to `align`.
    ///
    /// Returns `None` if the remaining space cannot satisfy the request.
    /// `align` must be a power of two.
    fn carve(&mut self, size: usize, align: usize) -> Option<Addr>;

    /// Bytes not yet handed out, ignoring alignment padding.
    fn remaining(&self) -> usize;

    /// Total bytes this space governs.
    fn capacity(&self) -> usize;
}
