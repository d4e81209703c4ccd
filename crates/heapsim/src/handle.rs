//! Opaque handles for live allocations

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a single allocator instance.
///
/// Every handle remembers the arena that minted it, so a handle presented to
/// a different allocator is rejected instead of aliasing an unrelated
/// allocation that happens to share its serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ArenaId(u64);

impl ArenaId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque identity of a live allocation.
///
/// Returned by [`Allocator::allocate`](crate::Allocator::allocate) and
/// consumed by [`Allocator::release`](crate::Allocator::release). A handle
/// carries no address or size; ask the allocator that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    arena: ArenaId,
    serial: u64,
}

impl Handle {
    pub(crate) const fn new(arena: ArenaId, serial: u64) -> Self {
        Self { arena, serial }
    }

    pub(crate) const fn arena(&self) -> ArenaId {
        self.arena
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.arena.0, self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_ids_are_unique() {
        let a = ArenaId::next();
        let b = ArenaId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn handles_from_different_arenas_differ() {
        let first = Handle::new(ArenaId::next(), 0);
        let second = Handle::new(ArenaId::next(), 0);
        assert_ne!(first, second);
        assert_eq!(first, first);
    }

    #[test]
    fn display_is_not_empty() {
        let handle = Handle::new(ArenaId::next(), 7);
        assert!(handle.to_string().ends_with(".7"));
    }
}
