//! Capability traits shared by simulated allocators

/// Cell usage tracking
///
/// Implemented by allocators that know how much of their arena is in use.
/// The arena size is fixed, so totals are always known.
pub trait MemoryUsage {
    /// Cells currently handed out to live allocations
    fn used_cells(&self) -> usize;

    /// Cells currently free
    fn available_cells(&self) -> usize;

    /// Total arena size in cells
    fn total_cells(&self) -> usize {
        self.used_cells() + self.available_cells()
    }

    /// Returns usage as a percentage (0.0 to 100.0)
    fn usage_percent(&self) -> f32 {
        let total = self.total_cells();
        if total == 0 {
            0.0
        } else {
            (self.used_cells() as f32 / total as f32) * 100.0
        }
    }

    /// Checks if usage is at or above the specified percentage threshold
    fn is_memory_pressure(&self, threshold_percent: f32) -> bool {
        self.usage_percent() >= threshold_percent
    }
}

/// Resettable allocator
///
/// Resetting releases every live allocation at once. Handles issued before
/// the reset are no longer accepted by `release`.
pub trait Resettable {
    /// Reset allocator to its initial state
    fn reset(&mut self);

    /// Check if this allocator holds anything worth resetting
    fn can_reset(&self) -> bool {
        true
    }

    /// Resets the allocator only if [`can_reset`](Self::can_reset) allows it
    ///
    /// Returns `true` if reset was performed, `false` if skipped.
    fn try_reset(&mut self) -> bool {
        if self.can_reset() {
            self.reset();
            true
        } else {
            false
        }
    }
}
