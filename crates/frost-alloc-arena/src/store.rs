//! The fixed-size backing byte region.
//!
//! A [`BackingStore`] is sized once at construction and never grows. Its
//! first usable byte sits on a [`BackingStore::BASE_ALIGN`] boundary, so an
//! offset that is aligned to any power of two up to that value is also
//! aligned as a machine address.

use frost_alloc_core::{align_up, Addr};

/// A single contiguous, fixed-capacity byte region.
///
/// The store owns its bytes for its whole lifetime; allocators address
/// them through [`Addr`] offsets and resolve them with [`bytes`] and
/// [`bytes_mut`].
///
/// [`bytes`]: BackingStore::bytes
/// [`bytes_mut`]: BackingStore::bytes_mut
pub struct BackingStore {
    /// Over-allocated storage; the usable view starts at `skew`.
    raw: Box<[u8]>,
    /// Padding in front of the first aligned byte.
    skew: usize,
    /// Usable length in bytes.
    len: usize,
}

impl BackingStore {
    /// Alignment of offset 0 as a machine address.
    pub const BASE_ALIGN: usize = 64;

    /// Create a zero-initialised store of `len` usable bytes.
    ///
    /// # Panics
    ///
    /// Panics if `len + BASE_ALIGN` overflows `usize`.
    pub fn new(len: usize) -> Self {
        let total = len
            .checked_add(Self::BASE_ALIGN)
            .unwrap_or_else(|| panic!("backing store of {len} bytes is too large"));
        let raw = vec![0u8; total].into_boxed_slice();
        let base = raw.as_ptr().addr();
        // base + skew never overflows: the allocation itself spans that far.
        let skew = align_up(base, Self::BASE_ALIGN).map_or(0, |aligned| aligned - base);
        Self { raw, skew, len }
    }

    /// Usable length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the store has no usable bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Machine address of offset 0.
    pub fn base_addr(&self) -> usize {
        self.raw.as_ptr().addr() + self.skew
    }

    /// Machine address of `addr`.
    pub fn absolute_addr(&self, addr: Addr) -> usize {
        self.base_addr() + addr.offset()
    }

    /// Whether `[addr, addr + len)` lies inside the store.
    pub fn contains_span(&self, addr: Addr, len: usize) -> bool {
        addr.checked_add(len)
            .is_some_and(|end| end.offset() <= self.len)
    }

    /// Get a shared slice at the given address and length.
    ///
    /// # Panics
    ///
    /// Panics if the span exceeds the store.
    pub fn bytes(&self, addr: Addr, len: usize) -> &[u8] {
        assert!(
            self.contains_span(addr, len),
            "span {addr}+{len} outside {}-byte store",
            self.len
        );
        let start = self.skew + addr.offset();
        &self.raw[start..start + len]
    }

    /// Get a mutable slice at the given address and length.
    ///
    /// # Panics
    ///
    /// Panics if the span exceeds the store.
    pub fn bytes_mut(&mut self, addr: Addr, len: usize) -> &mut [u8] {
        assert!(
            self.contains_span(addr, len),
            "span {addr}+{len} outside {}-byte store",
            self.len
        );
        let start = self.skew + addr.offset();
        &mut self.raw[start..start + len]
    }

    /// Overwrite `[addr, addr + len)` with `byte`.
    pub fn fill(&mut self, addr: Addr, len: usize, byte: u8) {
        self.bytes_mut(addr, len).fill(byte);
    }
}

impl std::fmt::Debug for BackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingStore")
            .field("base_addr", &format_args!("{:#x}", self.base_addr()))
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_alloc_core::is_aligned;

    #[test]
    fn base_is_aligned() {
        for len in [1, 7, 64, 1000] {
            let store = BackingStore::new(len);
            assert!(is_aligned(store.base_addr(), BackingStore::BASE_ALIGN));
            assert_eq!(store.len(), len);
        }
    }

    #[test]
    fn new_store_is_zeroed() {
        let store = BackingStore::new(128);
        assert!(store.bytes(Addr(0), 128).iter().all(|&b| b == 0));
    }

    #[test]
    fn bytes_mut_writes_are_visible() {
        let mut store = BackingStore::new(64);
        store.bytes_mut(Addr(8), 4).copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(store.bytes(Addr(8), 4), &[1, 2, 3, 4]);
        assert_eq!(store.bytes(Addr(12), 1), &[0]);
    }

    #[test]
    fn fill_covers_exact_span() {
        let mut store = BackingStore::new(32);
        store.fill(Addr(4), 8, 0xAA);
        let all = store.bytes(Addr(0), 32);
        assert!(all[..4].iter().all(|&b| b == 0));
        assert!(all[4..12].iter().all(|&b| b == 0xAA));
        assert!(all[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn contains_span_respects_len() {
        let store = BackingStore::new(16);
        assert!(store.contains_span(Addr(0), 16));
        assert!(store.contains_span(Addr(16), 0));
        assert!(!store.contains_span(Addr(8), 9));
        assert!(!store.contains_span(Addr(usize::MAX), 1));
    }

    #[test]
    #[should_panic(expected = "outside 16-byte store")]
    fn bytes_out_of_range_panics() {
        let store = BackingStore::new(16);
        let _ = store.bytes(Addr(12), 8);
    }

    #[test]
    fn absolute_addr_offsets_from_base() {
        let store = BackingStore::new(256);
        assert_eq!(store.absolute_addr(Addr(40)), store.base_addr() + 40);
    }
}
