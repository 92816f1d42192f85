//! Alignment arithmetic.

/// Alignment applied to every arena push and heap allocation unless the
/// caller asks for something else.
pub const DEFAULT_ALIGN: usize = 8;

/// Round `value` up to the next multiple of `align`.
///
/// Returns `None` if the result does not fit in `usize`.
///
/// # Panics
///
/// Panics if `align` is not a power of two. A bad alignment is a
/// programming error, not a runtime condition.
pub fn align_up(value: usize, align: usize) -> Option<usize> {
    assert!(
        align.is_power_of_two(),
        "alignment {align} is not a power of two"
    );
    let mask = align - 1;
    value.checked_add(mask).map(|v| v & !mask)
}

/// Whether `value` is a multiple of `align` (a power of two).
pub fn is_aligned(value: usize, align: usize) -> bool {
    debug_assert!(align.is_power_of_two());
    value & (align - 1) == 0
}
