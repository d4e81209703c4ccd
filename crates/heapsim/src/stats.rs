//! Allocator statistics tracking

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters for one simulated allocator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllocatorStats {
    /// Cells currently allocated
    pub allocated_cells: usize,
    /// Peak cells allocated at any point
    pub peak_allocated_cells: usize,
    /// Total number of successful allocations
    pub allocation_count: usize,
    /// Total number of successful releases
    pub release_count: usize,
    /// Number of allocations rejected with out-of-memory
    pub failed_allocations: usize,
    /// Total cells ever allocated (cumulative)
    pub total_cells_allocated: usize,
}

impl AllocatorStats {
    /// Creates a new empty stats object
    pub const fn new() -> Self {
        Self {
            allocated_cells: 0,
            peak_allocated_cells: 0,
            allocation_count: 0,
            release_count: 0,
            failed_allocations: 0,
            total_cells_allocated: 0,
        }
    }

    /// Reset all statistics to zero
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn record_allocation(&mut self, size: usize) {
        self.allocation_count += 1;
        self.total_cells_allocated += size;
        self.allocated_cells += size;
        self.peak_allocated_cells = self.peak_allocated_cells.max(self.allocated_cells);
    }

    pub(crate) fn record_release(&mut self, size: usize) {
        self.release_count += 1;
        self.allocated_cells = self.allocated_cells.saturating_sub(size);
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed_allocations += 1;
    }

    /// Calculate the average allocation size
    pub fn average_allocation_size(&self) -> Option<f64> {
        if self.allocation_count > 0 {
            Some(self.total_cells_allocated as f64 / self.allocation_count as f64)
        } else {
            None
        }
    }

    /// Fraction of allocation attempts that succeeded (0.0 to 1.0)
    pub fn allocation_efficiency(&self) -> f64 {
        let total_attempts = self.allocation_count + self.failed_allocations;
        if total_attempts > 0 {
            self.allocation_count as f64 / total_attempts as f64
        } else {
            1.0
        }
    }

    /// Check if there are any live allocations
    pub fn has_active_allocations(&self) -> bool {
        self.allocation_count > self.release_count
    }
}

impl fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Allocator Statistics:")?;
        writeln!(f, "  Current allocated: {} cells", self.allocated_cells)?;
        writeln!(f, "  Peak allocated: {} cells", self.peak_allocated_cells)?;
        writeln!(f, "  Allocations: {}", self.allocation_count)?;
        writeln!(f, "  Releases: {}", self.release_count)?;
        writeln!(f, "  Failed allocations: {}", self.failed_allocations)?;

        if let Some(avg) = self.average_allocation_size() {
            writeln!(f, "  Average allocation size: {avg:.2} cells")?;
        }

        writeln!(
            f,
            "  Allocation efficiency: {:.2}%",
            self.allocation_efficiency() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_cycle() {
        let mut stats = AllocatorStats::new();
        stats.record_allocation(10);
        stats.record_allocation(30);
        stats.record_release(10);

        assert_eq!(stats.allocated_cells, 30);
        assert_eq!(stats.peak_allocated_cells, 40);
        assert_eq!(stats.allocation_count, 2);
        assert_eq!(stats.release_count, 1);
        assert_eq!(stats.average_allocation_size(), Some(20.0));
        assert!(stats.has_active_allocations());
    }

    #[test]
    fn test_efficiency() {
        let mut stats = AllocatorStats::new();
        assert_eq!(stats.allocation_efficiency(), 1.0);

        stats.record_allocation(1);
        stats.record_failure();
        assert_eq!(stats.allocation_efficiency(), 0.5);

        stats.reset();
        assert_eq!(stats, AllocatorStats::default());
    }

    #[test]
    fn test_display() {
        let mut stats = AllocatorStats::new();
        stats.record_allocation(8);
        let text = stats.to_string();
        assert!(text.contains("Current allocated: 8 cells"));
        assert!(text.contains("Average allocation size: 8.00 cells"));
    }
}
