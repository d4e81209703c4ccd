//! Error types for heapsim
//!
//! Uses thiserror for clean, idiomatic Rust error definitions. Every failure
//! is local and recoverable: no variant leaves the arena partially mutated.

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::{error, warn};

use crate::handle::Handle;

// ============================================================================
// Main Error Type
// ============================================================================

/// Simulated heap errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    // --- Allocation Errors ---
    #[error("Invalid allocation size: {size} cells")]
    InvalidSize { size: usize },

    #[error(
        "Out of memory: requested {requested} cells, largest free region {largest_free} ({total_free} free in total)"
    )]
    OutOfMemory {
        requested: usize,
        largest_free: usize,
        total_free: usize,
    },

    // --- Release Errors ---
    #[error("Invalid handle: {handle} is not a live allocation of this arena")]
    InvalidHandle { handle: Handle },

    // --- Construction Errors ---
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // --- Diagnostics ---
    #[error("Heap corruption detected: {details}")]
    Corruption { details: String },
}

impl HeapError {
    /// Check if error is retryable
    ///
    /// Only an out-of-memory failure can succeed later, after other
    /// allocations have been released.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSize { .. } => "HEAP:ALLOC:SIZE",
            Self::OutOfMemory { .. } => "HEAP:ALLOC:OOM",
            Self::InvalidHandle { .. } => "HEAP:RELEASE:HANDLE",
            Self::InvalidConfig { .. } => "HEAP:CONFIG:INVALID",
            Self::Corruption { .. } => "HEAP:SYSTEM:CORRUPTION",
        }
    }

    /// True when enough cells are free in total but no single region is
    /// large enough.
    #[must_use]
    pub fn is_fragmentation(&self) -> bool {
        matches!(
            self,
            Self::OutOfMemory { requested, total_free, .. } if total_free >= requested
        )
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create invalid size error
    pub fn invalid_size(size: usize) -> Self {
        Self::InvalidSize { size }
    }

    /// Create out of memory error
    pub fn out_of_memory(requested: usize, largest_free: usize, total_free: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(requested, largest_free, total_free, "No free region large enough");

        Self::OutOfMemory {
            requested,
            largest_free,
            total_free,
        }
    }

    /// Create invalid handle error
    pub fn invalid_handle(handle: Handle) -> Self {
        #[cfg(feature = "logging")]
        warn!(%handle, "Release of a handle that is not live");

        Self::InvalidHandle { handle }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }

    /// Create heap corruption error
    pub fn corruption(details: impl Into<String>) -> Self {
        let details = details.into();

        #[cfg(feature = "logging")]
        error!(%details, "Heap corruption");

        Self::Corruption { details }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for heap operations
pub type HeapResult<T> = Result<T, HeapError>;

// ============================================================================
// Tests
// ============================================================================
