//! Strongly-typed identifiers for tracked storage.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`StorageId`] allocation.
static STORAGE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one backing allocation registered with a storage arena.
///
/// Allocated from a monotonic process-wide counter via
/// [`StorageId::next`], so an identifier is never reused even after the
/// storage it named has been freed. A handle that outlives its storage
/// therefore can never be mistaken for a handle to a newer allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageId(u64);

impl StorageId {
    /// Allocate a fresh, unique storage ID. Thread-safe.
    pub fn next() -> Self {
        Self(STORAGE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relocation counter of a single storage allocation.
///
/// Starts at zero and is bumped every time the storage is moved to a new
/// address. Handles record the generation they were resolved against.
///
/// The counter is 64 bits wide, so a handle can only be mistaken for a
/// current one after 2^64 relocations of the same storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_ids_are_unique() {
        let a = StorageId::next();
        let b = StorageId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn generation_advances() {
        assert_eq!(Generation(0).next(), Generation(1));
        assert_eq!(Generation::from(7).next(), Generation(8));
    }

    #[test]
    fn generation_outlasts_32_bit_counters() {
        let old = Generation(u64::from(u32::MAX));
        let new = old.next();
        assert_eq!(new, Generation(1 << 32));
        assert_ne!(new, Generation(0));
        assert!(new > old);
    }
}
