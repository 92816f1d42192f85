//! Allocator context configuration parameters.

use frost_alloc_core::ConfigError;

/// Configuration for an [`AllocatorContext`](crate::AllocatorContext).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextConfig {
    /// Size of the backing store in bytes. Fixed for the context's life.
    ///
    /// Default: 65_536 (64 KiB).
    pub backing_size: usize,

    /// Maximum number of live arenas.
    ///
    /// Default: 16.
    pub max_arenas: usize,

    /// Overwrite released heap blocks with
    /// [`AllocatorContext::POISON`](crate::AllocatorContext::POISON).
    ///
    /// Surfaces use-after-release in tests at the cost of a fill per
    /// release. Default: `false`.
    pub poison_released: bool,
}

impl ContextConfig {
    /// Default backing store size.
    pub const DEFAULT_BACKING_SIZE: usize = 64 * 1024;

    /// Default arena limit.
    pub const DEFAULT_MAX_ARENAS: usize = 16;

    /// Create a config for a backing store of `backing_size` bytes.
    ///
    /// Uses default values for all other parameters.
    pub fn new(backing_size: usize) -> Self {
        Self {
            backing_size,
            max_arenas: Self::DEFAULT_MAX_ARENAS,
            poison_released: false,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backing_size == 0 {
            return Err(ConfigError::ZeroBackingSize);
        }
        if self.max_arenas == 0 {
            return Err(ConfigError::ZeroMaxArenas);
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BACKING_SIZE)
    }
}
