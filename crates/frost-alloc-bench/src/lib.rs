//! Benchmark workloads for the FROST allocator.
//!
//! - [`SIZE_CLASSES`]: request sizes typical of the on-target parsers
//! - [`churn_workload`]: deterministic allocate/release interleaving
//!   against an [`AllocatorContext`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use frost_alloc_context::AllocatorContext;
use frost_alloc_core::Addr;

/// Request sizes cycled through by the workloads.
pub const SIZE_CLASSES: [usize; 6] = [8, 16, 24, 40, 64, 128];

/// Run `rounds` of allocate/release churn, holding at most `live` blocks.
///
/// Slot choice is a fixed multiplicative hash of the round number, so
/// every run issues the same request sequence. Returns the number of
/// allocations that came back empty.
pub fn churn_workload(ctx: &mut AllocatorContext, rounds: u64, live: usize) -> usize {
    let mut slots: Vec<Option<Addr>> = vec![None; live.max(1)];
    let mut failed = 0;
    for round in 0..rounds {
        let slot = (round.wrapping_mul(6364136223846793007) >> 33) as usize % slots.len();
        if let Some(addr) = slots[slot].take() {
            ctx.release(addr);
        }
        let size = SIZE_CLASSES[round as usize % SIZE_CLASSES.len()];
        match ctx.allocate(size) {
            Some(addr) => slots[slot] = Some(addr),
            None => failed += 1,
        }
    }
    for addr in slots.into_iter().flatten() {
        ctx.release(addr);
    }
    failed
}
