//! Simulated fixed-size heap allocator
//!
//! [`Allocator`] owns a [`FreeRegionList`] and a map from issued [`Handle`]
//! to [`Allocation`]. The placement policy is a type parameter; everything
//! else (split on allocate, coalesce on release) is shared.
//!
//! ```
//! use heapsim::{BestFitAllocator, HeapError};
//!
//! let mut heap = BestFitAllocator::new(10)?;
//! assert!(matches!(heap.allocate(11), Err(HeapError::OutOfMemory { .. })));
//!
//! let handle = heap.allocate(10)?;
//! assert_eq!(heap.address_of(handle), Some(0));
//!
//! heap.release(handle)?;
//! assert_eq!(heap.free_cells(), 10);
//! # Ok::<(), HeapError>(())
//! ```

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::debug;

use crate::config::AllocatorConfig;
use crate::error::{HeapError, HeapResult};
use crate::handle::{ArenaId, Handle};
use crate::layout::{HeapLayout, Span};
use crate::policy::{BestFit, FirstFit, PlacementPolicy, Strategy};
use crate::region::FreeRegionList;
use crate::stats::AllocatorStats;
use crate::traits::{MemoryUsage, Resettable};

/// A live allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Allocation {
    /// First cell of the allocation
    pub address: usize,
    /// Number of cells
    pub size: usize,
}

impl Allocation {
    /// One past the last cell
    #[inline]
    pub const fn end(&self) -> usize {
        self.address + self.size
    }
}

/// Allocator over an abstract arena of fixed size
#[derive(Debug, Clone)]
pub struct Allocator<P: PlacementPolicy = Strategy> {
    arena: ArenaId,
    capacity: usize,
    policy: P,
    free: FreeRegionList,
    live: IndexMap<Handle, Allocation>,
    next_serial: u64,
    stats: Option<AllocatorStats>,
}

/// Allocator that places each request in the first large enough region
pub type FirstFitAllocator = Allocator<FirstFit>;

/// Allocator that places each request in the smallest large enough region
pub type BestFitAllocator = Allocator<BestFit>;

impl<P: PlacementPolicy + Default> Allocator<P> {
    /// Creates an allocator over `[0, size)` with the policy's default value.
    pub fn new(size: usize) -> HeapResult<Self> {
        Self::with_policy(size, P::default())
    }
}

impl Allocator<Strategy> {
    /// Creates an allocator from a validated configuration
    pub fn from_config(config: &AllocatorConfig) -> HeapResult<Self> {
        config.validate()?;
        Ok(Self::build(
            config.arena_size,
            config.strategy,
            config.track_stats,
        ))
    }
}

impl<P: PlacementPolicy> Allocator<P> {
    /// Creates an allocator over `[0, size)` using `policy`.
    ///
    /// Statistics are tracked in debug builds only; use
    /// [`Allocator::from_config`] for explicit control.
    pub fn with_policy(size: usize, policy: P) -> HeapResult<Self> {
        if size == 0 {
            return Err(HeapError::invalid_config("arena_size must be positive"));
        }
        Ok(Self::build(size, policy, cfg!(debug_assertions)))
    }

    fn build(capacity: usize, policy: P, track_stats: bool) -> Self {
        let allocator = Self {
            arena: ArenaId::next(),
            capacity,
            policy,
            free: FreeRegionList::new(capacity),
            live: IndexMap::new(),
            next_serial: 0,
            stats: track_stats.then(AllocatorStats::new),
        };

        #[cfg(feature = "logging")]
        debug!(
            capacity,
            policy = allocator.policy.name(),
            track_stats,
            "Created simulated heap"
        );

        allocator
    }

    /// Arena size in cells
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Allocates `size` cells and returns a handle to them.
    ///
    /// The cells always start at the lowest address of the region chosen by
    /// the policy. Fails with [`HeapError::InvalidSize`] for a zero size and
    /// with [`HeapError::OutOfMemory`] when no region is large enough; the
    /// heap is unchanged on failure.
    pub fn allocate(&mut self, size: usize) -> HeapResult<Handle> {
        if size == 0 {
            return Err(HeapError::invalid_size(size));
        }

        let Some(index) = self.policy.select(&self.free, size) else {
            if let Some(stats) = &mut self.stats {
                stats.record_failure();
            }
            return Err(HeapError::out_of_memory(
                size,
                self.free.largest(),
                self.free.total_free(),
            ));
        };

        let Some(address) = self.free.consume(index, size) else {
            return Err(HeapError::corruption(format!(
                "{} selected free region {index}, which cannot hold {size} cells",
                self.policy.name()
            )));
        };

        let handle = Handle::new(self.arena, self.next_serial);
        self.next_serial += 1;
        self.live.insert(handle, Allocation { address, size });

        if let Some(stats) = &mut self.stats {
            stats.record_allocation(size);
        }

        #[cfg(feature = "logging")]
        debug!(%handle, address, size, policy = self.policy.name(), "Allocated cells");

        Ok(handle)
    }

    /// Releases the allocation behind `handle` and coalesces the freed span
    /// with its free neighbours.
    ///
    /// Fails with [`HeapError::InvalidHandle`] if `handle` is not live in
    /// this arena (unknown, foreign, or already released); nothing changes.
    pub fn release(&mut self, handle: Handle) -> HeapResult<()> {
        if handle.arena() != self.arena {
            return Err(HeapError::invalid_handle(handle));
        }
        let Some(&allocation) = self.live.get(&handle) else {
            return Err(HeapError::invalid_handle(handle));
        };

        // Free list first: if it refuses the span, the map still owns it.
        self.free
            .insert_and_coalesce(allocation.address, allocation.size)?;
        self.live.shift_remove(&handle);

        if let Some(stats) = &mut self.stats {
            stats.record_release(allocation.size);
        }

        #[cfg(feature = "logging")]
        debug!(
            %handle,
            address = allocation.address,
            size = allocation.size,
            free_regions = self.free.len(),
            "Released cells"
        );

        Ok(())
    }

    /// Snapshot of free spans (address order) and allocated spans (issue
    /// order).
    pub fn layout(&self) -> HeapLayout {
        let free = self
            .free
            .iter()
            .map(|region| Span::from_extent(region.address, region.length))
            .collect();
        let allocated = self
            .live
            .values()
            .map(|allocation| Span::from_extent(allocation.address, allocation.size))
            .collect();
        HeapLayout::new(free, allocated)
    }

    /// The allocation behind `handle`, if it is live in this arena
    pub fn allocation(&self, handle: Handle) -> Option<Allocation> {
        if handle.arena() != self.arena {
            return None;
        }
        self.live.get(&handle).copied()
    }

    /// Address of the first cell behind `handle`, if it is live
    pub fn address_of(&self, handle: Handle) -> Option<usize> {
        self.allocation(handle).map(|allocation| allocation.address)
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.allocation(handle).is_some()
    }

    /// Live allocations in issue order
    pub fn allocations(&self) -> impl Iterator<Item = (Handle, Allocation)> + '_ {
        self.live.iter().map(|(&handle, &allocation)| (handle, allocation))
    }

    pub fn live_allocations(&self) -> usize {
        self.live.len()
    }

    pub fn free_regions(&self) -> &FreeRegionList {
        &self.free
    }

    pub fn free_cells(&self) -> usize {
        self.free.total_free()
    }

    pub fn allocated_cells(&self) -> usize {
        self.live.values().map(|allocation| allocation.size).sum()
    }

    pub fn largest_free_region(&self) -> usize {
        self.free.largest()
    }

    /// External fragmentation: `1 - largest_free / total_free`.
    ///
    /// 0.0 when nothing is free or all free cells form one region.
    pub fn fragmentation(&self) -> f64 {
        let total = self.free.total_free();
        if total == 0 {
            return 0.0;
        }
        1.0 - self.free.largest() as f64 / total as f64
    }

    /// Statistics, when tracking is enabled
    pub fn stats(&self) -> Option<AllocatorStats> {
        self.stats
    }

    /// Checks every arena invariant.
    ///
    /// Free and allocated spans must tile `[0, capacity)` exactly, free
    /// regions must be sorted and never adjacent.
    pub fn verify(&self) -> HeapResult<()> {
        self.free.check(self.capacity)?;

        let mut spans: Vec<(usize, usize, bool)> = self
            .free
            .iter()
            .map(|region| (region.address, region.end(), true))
            .chain(
                self.live
                    .values()
                    .map(|allocation| (allocation.address, allocation.end(), false)),
            )
            .collect();
        spans.sort_unstable();

        let mut cursor = 0;
        for (start, end, is_free) in spans {
            let kind = if is_free { "free" } else { "allocated" };
            if start < cursor {
                return Err(HeapError::corruption(format!(
                    "{kind} span [{start}, {end}) overlaps cells below {cursor}"
                )));
            }
            if start > cursor {
                return Err(HeapError::corruption(format!(
                    "cells [{cursor}, {start}) are neither free nor allocated"
                )));
            }
            if end <= start {
                return Err(HeapError::corruption(format!(
                    "{kind} span at {start} is empty"
                )));
            }
            cursor = end;
        }

        if cursor != self.capacity {
            return Err(HeapError::corruption(format!(
                "spans cover {cursor} cells of an arena of {}",
                self.capacity
            )));
        }

        Ok(())
    }
}

impl<P: PlacementPolicy> Resettable for Allocator<P> {
    fn reset(&mut self) {
        if let Some(stats) = &mut self.stats {
            for allocation in self.live.values() {
                stats.record_release(allocation.size);
            }
        }
        self.live.clear();
        self.free.reset(self.capacity);

        #[cfg(feature = "logging")]
        debug!(capacity = self.capacity, "Reset simulated heap");
    }

    fn can_reset(&self) -> bool {
        !self.live.is_empty()
    }
}

impl<P: PlacementPolicy> MemoryUsage for Allocator<P> {
    fn used_cells(&self) -> usize {
        self.allocated_cells()
    }

    fn available_cells(&self) -> usize {
        self.free_cells()
    }

    fn total_cells(&self) -> usize {
        self.capacity
    }
}
