//! Address-ordered free region bookkeeping
//!
//! [`FreeRegionList`] owns every unallocated span of the arena. Regions are
//! kept sorted by address and are never adjacent: whenever a span is
//! returned, it is merged with whichever neighbours touch it. The only two
//! mutators are [`FreeRegionList::consume`] (split on allocate) and
//! [`FreeRegionList::insert_and_coalesce`] (merge on release).

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::trace;

use crate::error::{HeapError, HeapResult};

/// A maximal contiguous span of unallocated cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreeRegion {
    /// First cell of the region
    pub address: usize,
    /// Number of cells, always positive inside a list
    pub length: usize,
}

impl FreeRegion {
    pub const fn new(address: usize, length: usize) -> Self {
        Self { address, length }
    }

    /// One past the last cell of the region
    #[inline]
    pub const fn end(&self) -> usize {
        self.address + self.length
    }

    /// Whether `next` starts exactly where this region ends
    #[inline]
    pub const fn touches(&self, next: &Self) -> bool {
        self.end() == next.address
    }
}

impl fmt::Display for FreeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.address, self.length)
    }
}

/// Sorted, coalesced set of free regions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeRegionList {
    regions: Vec<FreeRegion>,
}

impl FreeRegionList {
    /// Creates a list covering `[0, capacity)` with a single region.
    ///
    /// A zero capacity yields an empty list.
    pub fn new(capacity: usize) -> Self {
        let mut regions = Vec::with_capacity(4);
        if capacity > 0 {
            regions.push(FreeRegion::new(0, capacity));
        }
        Self { regions }
    }

    /// Builds a list by releasing each span in turn, so the result is always
    /// sorted and coalesced regardless of input order.
    pub fn from_regions<I>(regions: I) -> HeapResult<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut list = Self::default();
        for (address, length) in regions {
            list.insert_and_coalesce(address, length)?;
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FreeRegion> {
        self.regions.get(index)
    }

    pub fn as_slice(&self) -> &[FreeRegion] {
        &self.regions
    }

    pub fn iter(&self) -> core::slice::Iter<'_, FreeRegion> {
        self.regions.iter()
    }

    /// Total number of free cells
    pub fn total_free(&self) -> usize {
        self.regions.iter().map(|region| region.length).sum()
    }

    /// Length of the largest region, 0 when nothing is free
    pub fn largest(&self) -> usize {
        self.regions
            .iter()
            .map(|region| region.length)
            .max()
            .unwrap_or(0)
    }

    /// Index of the first region, in address order, holding at least `size`
    /// cells.
    pub fn find_first_fit(&self, size: usize) -> Option<usize> {
        self.regions.iter().position(|region| region.length >= size)
    }

    /// Index of the smallest region holding at least `size` cells.
    ///
    /// Ties go to the lowest address: the scan only replaces its current
    /// candidate on a strictly smaller length.
    pub fn find_best_fit(&self, size: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;

        for (index, region) in self.regions.iter().enumerate() {
            if region.length < size {
                continue;
            }
            match best {
                Some((_, best_length)) if region.length >= best_length => {}
                _ => best = Some((index, region.length)),
            }
            if region.length == size {
                // Nothing can beat an exact fit, and later exact fits lose the tie.
                break;
            }
        }

        best.map(|(index, _)| index)
    }

    /// Carves `size` cells from the low end of the region at `index`.
    ///
    /// Returns the carved address, or `None` without touching the list when
    /// `index` is out of range, `size` is zero, or the region is too small.
    pub fn consume(&mut self, index: usize, size: usize) -> Option<usize> {
        let region = self.regions.get_mut(index)?;
        if size == 0 || region.length < size {
            return None;
        }

        let address = region.address;
        if region.length == size {
            self.regions.remove(index);
        } else {
            region.address += size;
            region.length -= size;
        }
        Some(address)
    }

    /// Returns `[address, address + length)` to the free set, merging it with
    /// address-adjacent neighbours.
    ///
    /// Fails with [`HeapError::Corruption`] if the span is empty or overlaps a
    /// region that is already free; the list is left unchanged in that case.
    pub fn insert_and_coalesce(&mut self, address: usize, length: usize) -> HeapResult<()> {
        if length == 0 {
            return Err(HeapError::corruption(format!(
                "cannot free an empty span at {address}"
            )));
        }
        let freed = FreeRegion::new(address, length);

        // First region starting at or after the freed span.
        let index = self.regions.partition_point(|region| region.address < address);
        let prev = index.checked_sub(1).map(|i| self.regions[i]);
        let next = self.regions.get(index).copied();

        if let Some(prev) = prev
            && prev.end() > address
        {
            return Err(HeapError::corruption(format!(
                "freed span {freed} overlaps free region {prev}"
            )));
        }
        if let Some(next) = next
            && freed.end() > next.address
        {
            return Err(HeapError::corruption(format!(
                "freed span {freed} overlaps free region {next}"
            )));
        }

        let merges_prev = prev.is_some_and(|prev| prev.touches(&freed));
        let merges_next = next.is_some_and(|next| freed.touches(&next));

        match (merges_prev, merges_next) {
            (true, true) => {
                let next = self.regions.remove(index);
                self.regions[index - 1].length += length + next.length;
            }
            (true, false) => {
                self.regions[index - 1].length += length;
            }
            (false, true) => {
                let next = &mut self.regions[index];
                next.address = address;
                next.length += length;
            }
            (false, false) => {
                self.regions.insert(index, freed);
            }
        }

        #[cfg(feature = "logging")]
        trace!(
            address,
            length,
            merges_prev,
            merges_next,
            regions = self.regions.len(),
            "Coalesced freed span"
        );

        Ok(())
    }

    /// Removes every region and restores the single `[0, capacity)` span.
    pub(crate) fn reset(&mut self, capacity: usize) {
        self.regions.clear();
        if capacity > 0 {
            self.regions.push(FreeRegion::new(0, capacity));
        }
    }

    /// Checks ordering, positivity and non-adjacency of the regions, and that
    /// all of them lie inside `[0, capacity)`.
    pub fn check(&self, capacity: usize) -> HeapResult<()> {
        for region in &self.regions {
            if region.length == 0 {
                return Err(HeapError::corruption(format!(
                    "empty free region at {}",
                    region.address
                )));
            }
            if region.end() > capacity {
                return Err(HeapError::corruption(format!(
                    "free region {region} extends past arena end {capacity}"
                )));
            }
        }

        for pair in self.regions.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if left.end() > right.address {
                return Err(HeapError::corruption(format!(
                    "free regions {left} and {right} are out of order or overlap"
                )));
            }
            if left.touches(&right) {
                return Err(HeapError::corruption(format!(
                    "free regions {left} and {right} are adjacent but not merged"
                )));
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a FreeRegionList {
    type Item = &'a FreeRegion;
    type IntoIter = core::slice::Iter<'a, FreeRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
