//! Reusable allocator test fixtures.
//!
//! - [`MockSpace`]: a bounded raw-space supplier that counts carves.
//! - [`assert_disjoint`]: panics if any two spans overlap.
//! - [`assert_aligned`]: panics if any address misses an alignment.
//! - [`init_tracing`]: installs a test-writer subscriber once per process.

use std::sync::Once;

use frost_alloc_core::{align_up, is_aligned, Addr, RawSpace};
use tracing_subscriber::EnvFilter;

/// A raw-space supplier over `[0, limit)` with no backing bytes.
///
/// Useful for exercising heap bookkeeping without a store, and for
/// counting how often the heap falls back to fresh space.
pub struct MockSpace {
    cursor: usize,
    limit: usize,
    carves: usize,
}

impl MockSpace {
    pub fn new(limit: usize) -> Self {
        Self {
            cursor: 0,
            limit,
            carves: 0,
        }
    }

    /// Number of successful carves so far.
    pub fn carve_count(&self) -> usize {
        self.carves
    }

    /// Bytes handed out so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.cursor
    }
}

impl RawSpace for MockSpace {
    fn carve(&mut self, size: usize, align: usize) -> Option<Addr> {
        let start = align_up(self.cursor, align)?;
        let end = start.checked_add(size).filter(|&end| end <= self.limit)?;
        self.cursor = end;
        self.carves += 1;
        Some(Addr(start))
    }

    fn remaining(&self) -> usize {
        self.limit - self.cursor
    }

    fn capacity(&self) -> usize {
        self.limit
    }
}

/// Assert that no two `(addr, len)` spans overlap.
///
/// Zero-length spans never overlap anything.
pub fn assert_disjoint(spans: &[(Addr, usize)]) {
    let mut sorted: Vec<_> = spans.iter().copied().filter(|&(_, len)| len > 0).collect();
    sorted.sort_by_key(|&(addr, _)| addr);
    for pair in sorted.windows(2) {
        let (a, a_len) = pair[0];
        let (b, _) = pair[1];
        assert!(
            a.offset() + a_len <= b.offset(),
            "span {a}+{a_len} overlaps span starting at {b}"
        );
    }
}

/// Assert that every address is a multiple of `align`.
pub fn assert_aligned(addrs: &[usize], align: usize) {
    for &addr in addrs {
        assert!(
            is_aligned(addr, align),
            "address {addr:#x} is not {align}-byte aligned"
        );
    }
}

static TRACING: Once = Once::new();

/// Install a `fmt` subscriber writing through the test harness.
///
/// Filtering follows `RUST_LOG`; with it unset nothing is printed.
/// Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
