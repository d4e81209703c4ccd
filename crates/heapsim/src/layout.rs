//! Point-in-time layout snapshots
//!
//! [`HeapLayout`] is plain data. Rendering it is left to the caller; the
//! `Display` impl produces the classic two-section text dump.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A span of cells with an inclusive end
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// First cell
    pub start: usize,
    /// Last cell (inclusive)
    pub end: usize,
}

impl Span {
    /// Span covering `size` cells from `address`. `size` must be positive.
    pub(crate) const fn from_extent(address: usize, size: usize) -> Self {
        debug_assert!(size > 0, "span must cover at least one cell");
        Self {
            start: address,
            end: address + size - 1,
        }
    }

    /// Number of cells covered
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// One section of a layout report
///
/// An empty section is its own variant so consumers cannot silently print
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpanList {
    /// No spans of this kind exist
    Empty,
    /// At least one span
    Spans(Vec<Span>),
}

impl SpanList {
    pub(crate) fn from_vec(spans: Vec<Span>) -> Self {
        if spans.is_empty() {
            Self::Empty
        } else {
            Self::Spans(spans)
        }
    }

    pub fn as_slice(&self) -> &[Span] {
        match self {
            Self::Empty => &[],
            Self::Spans(spans) => spans,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Total cells covered by the section
    pub fn cells(&self) -> usize {
        self.as_slice().iter().map(Span::len).sum()
    }
}

/// Snapshot of free and allocated spans
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeapLayout {
    /// Free spans in ascending address order
    pub free: SpanList,
    /// Allocated spans in issue order, not necessarily sorted by address
    pub allocated: SpanList,
}

impl HeapLayout {
    pub(crate) fn new(free: Vec<Span>, allocated: Vec<Span>) -> Self {
        Self {
            free: SpanList::from_vec(free),
            allocated: SpanList::from_vec(allocated),
        }
    }

    /// Allocated spans sorted by address
    pub fn allocated_sorted(&self) -> Vec<Span> {
        let mut spans = self.allocated.as_slice().to_vec();
        spans.sort_unstable();
        spans
    }
}

impl fmt::Display for HeapLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Free")?;
        match &self.free {
            SpanList::Empty => writeln!(f, "No free memory space")?,
            SpanList::Spans(spans) => {
                for span in spans {
                    writeln!(f, "{span}")?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Allocated")?;
        match &self.allocated {
            SpanList::Empty => writeln!(f, "No allocated memory space"),
            SpanList::Spans(spans) => {
                for span in spans {
                    writeln!(f, "{span}")?;
                }
                Ok(())
            }
        }
    }
}
