//! Placement policies
//!
//! A policy only decides *which* free region serves a request. Splitting and
//! coalescing live in [`FreeRegionList`] and are shared by every policy.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::HeapError;
use crate::region::FreeRegionList;

/// Chooses the free region that will serve an allocation.
pub trait PlacementPolicy {
    /// Short policy name used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// Index into `free` of the region to carve `size` cells from, or `None`
    /// if no region qualifies.
    fn select(&self, free: &FreeRegionList, size: usize) -> Option<usize>;
}

/// First region in address order that is large enough
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FirstFit;

impl PlacementPolicy for FirstFit {
    fn name(&self) -> &'static str {
        "first-fit"
    }

    #[inline]
    fn select(&self, free: &FreeRegionList, size: usize) -> Option<usize> {
        free.find_first_fit(size)
    }
}

/// Smallest region that is large enough, earliest address on ties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BestFit;

impl PlacementPolicy for BestFit {
    fn name(&self) -> &'static str {
        "best-fit"
    }

    #[inline]
    fn select(&self, free: &FreeRegionList, size: usize) -> Option<usize> {
        free.find_best_fit(size)
    }
}

/// Placement strategy chosen at runtime, e.g. from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Strategy {
    /// First fit - use first available region
    #[default]
    FirstFit,
    /// Best fit - use smallest sufficient region
    BestFit,
}

impl Strategy {
    pub const ALL: [Self; 2] = [Self::FirstFit, Self::BestFit];
}

impl PlacementPolicy for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Self::FirstFit => FirstFit.name(),
            Self::BestFit => BestFit.name(),
        }
    }

    fn select(&self, free: &FreeRegionList, size: usize) -> Option<usize> {
        match self {
            Self::FirstFit => FirstFit.select(free, size),
            Self::BestFit => BestFit.select(free, size),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = HeapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-fit" | "firstfit" | "first" => Ok(Self::FirstFit),
            "best-fit" | "bestfit" | "best" => Ok(Self::BestFit),
            other => Err(HeapError::invalid_config(&format!(
                "unknown placement strategy '{other}'"
            ))),
        }
    }
}

impl From<FirstFit> for Strategy {
    fn from(_: FirstFit) -> Self {
        Self::FirstFit
    }
}

impl From<BestFit> for Strategy {
    fn from(_: BestFit) -> Self {
        Self::BestFit
    }
}
