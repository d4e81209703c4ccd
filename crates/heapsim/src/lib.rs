//! # heapsim
//!
//! A simulated heap: a fixed-size arena of abstract cells managed by a
//! first-fit or best-fit allocator. Nothing here touches real memory; the
//! arena is an address space `[0, N)` and allocations are bookkeeping.
//!
//! ## Quick Start
//!
//! ```rust
//! use heapsim::prelude::*;
//!
//! let mut heap = FirstFitAllocator::new(1024)?;
//!
//! let a = heap.allocate(100)?;
//! let b = heap.allocate(50)?;
//! heap.release(a)?;
//!
//! // Released spans are merged with their free neighbours right away.
//! println!("{}", heap.layout());
//! heap.release(b)?;
//! assert_eq!(heap.free_regions().len(), 1);
//! # Ok::<(), HeapError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`region`]: the address-ordered, always-coalesced free region list
//! - [`policy`]: placement policies ([`FirstFit`], [`BestFit`], runtime
//!   [`Strategy`])
//! - [`allocator`]: handle bookkeeping on top of the free list
//! - [`layout`]: data-only snapshots for diagnostics
//!
//! ## Features
//!
//! - `logging` (default): structured `tracing` events for allocate, release
//!   and coalescing
//! - `serde`: `Serialize`/`Deserialize` for configuration, layouts and stats

#![cfg_attr(docsrs, feature(doc_cfg))]

// Error types
pub mod error;

// Core modules
pub mod allocator;
pub mod config;
pub mod handle;
pub mod layout;
pub mod policy;
pub mod region;
pub mod stats;
pub mod traits;

pub use crate::allocator::{Allocation, Allocator, BestFitAllocator, FirstFitAllocator};
pub use crate::config::AllocatorConfig;
pub use crate::error::{HeapError, HeapResult};
pub use crate::handle::Handle;
pub use crate::layout::{HeapLayout, Span, SpanList};
pub use crate::policy::{BestFit, FirstFit, PlacementPolicy, Strategy};
pub use crate::region::{FreeRegion, FreeRegionList};
pub use crate::stats::AllocatorStats;

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::allocator::{Allocation, Allocator, BestFitAllocator, FirstFitAllocator};
    pub use crate::config::AllocatorConfig;
    pub use crate::error::{HeapError, HeapResult};
    pub use crate::handle::Handle;
    pub use crate::layout::{HeapLayout, Span, SpanList};
    pub use crate::policy::{BestFit, FirstFit, PlacementPolicy, Strategy};
    pub use crate::stats::AllocatorStats;
    pub use crate::traits::{MemoryUsage, Resettable};
}
