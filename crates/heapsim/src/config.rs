//! Allocator configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{HeapError, HeapResult};
use crate::policy::Strategy;

/// Default arena size in cells
pub const DEFAULT_ARENA_SIZE: usize = 1024;

/// Configuration for a simulated allocator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllocatorConfig {
    /// Number of cells in the arena, fixed for the allocator's lifetime
    pub arena_size: usize,

    /// Placement strategy
    pub strategy: Strategy,

    /// Enable statistics tracking
    pub track_stats: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            arena_size: DEFAULT_ARENA_SIZE,
            strategy: Strategy::FirstFit,
            track_stats: cfg!(debug_assertions),
        }
    }
}

impl AllocatorConfig {
    /// Create a configuration for an arena of `arena_size` cells
    #[must_use]
    pub fn new(arena_size: usize) -> Self {
        Self {
            arena_size,
            ..Self::default()
        }
    }

    /// Production configuration - no statistics overhead
    #[must_use]
    pub fn production() -> Self {
        Self {
            track_stats: false,
            ..Self::default()
        }
    }

    /// Debug configuration - statistics always on
    #[must_use]
    pub fn debug() -> Self {
        Self {
            track_stats: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, track_stats: bool) -> Self {
        self.track_stats = track_stats;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> HeapResult<()> {
        if self.arena_size == 0 {
            return Err(HeapError::invalid_config("arena_size must be positive"));
        }
        Ok(())
    }
}
