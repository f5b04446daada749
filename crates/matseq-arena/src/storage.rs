//! Registry of non-relocating `f32` allocations.
//!
//! [`StorageArena`] is where matrices and vectors live while sequences
//! refer to them by address. Each allocation gets a fresh [`StorageId`]
//! and starts at generation 0. Resizing moves the data and bumps the
//! generation; freeing removes the entry. Either makes every previously
//! resolved [`MemoryHandle`] fail [`StorageArena::check`].

use indexmap::IndexMap;
use matseq_core::{Generation, StorageId};

use crate::error::ArenaError;
use crate::handle::{MemoryHandle, StorageKey};
use crate::raw::RawRegion;

struct StorageEntry {
    region: RawRegion,
    generation: Generation,
}

/// Owner of every tracked backing region.
///
/// Taking `&mut StorageArena` is how callers prove that no safe borrow
/// of any tracked region is outstanding, which is what a sequence needs
/// before it writes through recorded addresses.
#[derive(Default)]
pub struct StorageArena {
    entries: IndexMap<StorageId, StorageEntry>,
}

impl StorageArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `len` zeroed elements.
    pub fn alloc(&mut self, len: u32) -> Result<StorageId, ArenaError> {
        let region = RawRegion::zeroed(len as usize)?;
        let id = StorageId::next();
        self.entries.insert(
            id,
            StorageEntry {
                region,
                generation: Generation::default(),
            },
        );
        tracing::debug!(storage = %id, len, "storage allocated");
        Ok(id)
    }

    /// Allocate storage initialised with a copy of `data`.
    pub fn alloc_from(&mut self, data: &[f32]) -> Result<StorageId, ArenaError> {
        let len = u32::try_from(data.len()).map_err(|_| ArenaError::AllocationFailed {
            requested: data.len() * std::mem::size_of::<f32>(),
            capacity: 0,
        })?;
        let id = self.alloc(len)?;
        self.write(id)?.copy_from_slice(data);
        Ok(id)
    }

    /// Release a storage allocation.
    pub fn free(&mut self, id: StorageId) -> Result<(), ArenaError> {
        if self.entries.swap_remove(&id).is_none() {
            return Err(ArenaError::UnknownStorage { storage: id });
        }
        tracing::debug!(storage = %id, "storage freed");
        Ok(())
    }

    /// Move a storage allocation to a new region of `len` elements.
    ///
    /// The common prefix is copied and any new tail is zeroed. Returns
    /// the new generation; handles resolved before the call are stale.
    pub fn resize(&mut self, id: StorageId, len: u32) -> Result<Generation, ArenaError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(ArenaError::UnknownStorage { storage: id })?;
        let mut region = RawRegion::zeroed(len as usize)?;
        let keep = entry.region.len().min(region.len());
        region.as_mut_slice()[..keep].copy_from_slice(&entry.region.as_slice()[..keep]);
        entry.region = region;
        entry.generation = entry.generation.next();
        tracing::debug!(storage = %id, len, generation = %entry.generation, "storage relocated");
        Ok(entry.generation)
    }

    /// Read a storage region's contents.
    pub fn read(&self, id: StorageId) -> Result<&[f32], ArenaError> {
        self.entries
            .get(&id)
            .map(|e| e.region.as_slice())
            .ok_or(ArenaError::UnknownStorage { storage: id })
    }

    /// Get a storage region's contents for writing.
    pub fn write(&mut self, id: StorageId) -> Result<&mut [f32], ArenaError> {
        self.entries
            .get_mut(&id)
            .map(|e| e.region.as_mut_slice())
            .ok_or(ArenaError::UnknownStorage { storage: id })
    }

    /// Current generation of a storage allocation.
    pub fn generation(&self, id: StorageId) -> Result<Generation, ArenaError> {
        self.entries
            .get(&id)
            .map(|e| e.generation)
            .ok_or(ArenaError::UnknownStorage { storage: id })
    }

    /// Resolve a handle to `len` elements starting at element `offset`.
    pub fn handle(
        &self,
        id: StorageId,
        offset: u32,
        len: u32,
    ) -> Result<MemoryHandle, ArenaError> {
        let entry = self
            .entries
            .get(&id)
            .ok_or(ArenaError::UnknownStorage { storage: id })?;
        let storage_len = entry.region.len();
        let fits = offset
            .checked_add(len)
            .is_some_and(|end| end as usize <= storage_len);
        if !fits {
            return Err(ArenaError::OutOfBounds {
                storage: id,
                offset,
                len,
                storage_len,
            });
        }
        let key = StorageKey {
            storage: id,
            generation: entry.generation,
        };
        Ok(MemoryHandle::tracked(
            entry.region.element_addr(offset as usize),
            len,
            key,
        ))
    }

    /// Resolve a handle covering a whole storage allocation.
    pub fn whole(&self, id: StorageId) -> Result<MemoryHandle, ArenaError> {
        let len = self.read(id)?.len() as u32;
        self.handle(id, 0, len)
    }

    /// Check that a tracked handle still refers to live, unmoved storage.
    ///
    /// Untracked handles pass unconditionally; they are the caller's
    /// responsibility.
    pub fn check(&self, handle: &MemoryHandle) -> Result<(), ArenaError> {
        let Some(key) = handle.key() else {
            return Ok(());
        };
        let entry = self
            .entries
            .get(&key.storage)
            .ok_or(ArenaError::UnknownStorage {
                storage: key.storage,
            })?;
        if entry.generation != key.generation {
            return Err(ArenaError::StaleHandle {
                storage: key.storage,
                handle_generation: key.generation,
                current_generation: entry.generation,
            });
        }
        Ok(())
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: StorageId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of live allocations.
    pub fn storage_count(&self) -> usize {
        self.entries.len()
    }

    /// Total memory usage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.entries
            .values()
            .map(|e| e.region.len() * std::mem::size_of::<f32>())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_creates_zeroed_storage() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(16).unwrap();
        let data = arena.read(id).unwrap();
        assert_eq!(data.len(), 16);
        assert!(data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn alloc_from_copies_contents() {
        let mut arena = StorageArena::new();
        let id = arena.alloc_from(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(arena.read(id).unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn handle_address_matches_slice() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(16).unwrap();
        let h = arena.handle(id, 4, 4).unwrap();
        let data = arena.read(id).unwrap();
        assert_eq!(h.addr(), crate::address_of(data, 4));
        assert_eq!(h.len(), 4);
        assert!(h.is_tracked());
    }

    #[test]
    fn whole_covers_entire_region() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(16).unwrap();
        let h = arena.whole(id).unwrap();
        assert_eq!(h.len(), 16);
        assert_eq!(h.addr(), arena.read(id).unwrap().as_ptr() as usize);
    }

    #[test]
    fn handle_out_of_bounds() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(16).unwrap();
        assert!(matches!(
            arena.handle(id, 8, 16),
            Err(ArenaError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn writes_do_not_move_storage() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(16).unwrap();
        let h = arena.whole(id).unwrap();
        arena.write(id).unwrap()[0] = 3.0;
        let _other = arena.alloc(1024).unwrap();
        assert_eq!(arena.whole(id).unwrap().addr(), h.addr());
        assert!(arena.check(&h).is_ok());
    }

    #[test]
    fn resize_makes_handles_stale() {
        let mut arena = StorageArena::new();
        let id = arena.alloc_from(&[1.0, 2.0]).unwrap();
        let h = arena.whole(id).unwrap();
        let gen = arena.resize(id, 4).unwrap();
        assert_eq!(gen, Generation(1));
        assert_eq!(arena.read(id).unwrap(), &[1.0, 2.0, 0.0, 0.0]);
        assert!(matches!(
            arena.check(&h),
            Err(ArenaError::StaleHandle {
                handle_generation: Generation(0),
                current_generation: Generation(1),
                ..
            })
        ));
        let fresh = arena.whole(id).unwrap();
        assert!(arena.check(&fresh).is_ok());
    }

    #[test]
    fn every_relocation_strands_earlier_handles() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(4).unwrap();
        let first = arena.whole(id).unwrap();
        let mut last = Generation(0);
        for len in 5..70 {
            last = arena.resize(id, len).unwrap();
        }
        assert_eq!(last, Generation(65));
        assert_eq!(arena.generation(id).unwrap(), last);
        assert!(arena.check(&first).is_err());
        assert!(arena.check(&arena.whole(id).unwrap()).is_ok());
    }

    #[test]
    fn free_makes_handles_unknown() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(4).unwrap();
        let h = arena.whole(id).unwrap();
        arena.free(id).unwrap();
        assert!(!arena.contains(id));
        assert!(matches!(
            arena.check(&h),
            Err(ArenaError::UnknownStorage { .. })
        ));
    }

    #[test]
    fn double_free_is_an_error() {
        let mut arena = StorageArena::new();
        let id = arena.alloc(4).unwrap();
        arena.free(id).unwrap();
        assert_eq!(arena.free(id), Err(ArenaError::UnknownStorage { storage: id }));
    }

    #[test]
    fn ids_are_not_reused_after_free() {
        let mut arena = StorageArena::new();
        let a = arena.alloc(4).unwrap();
        arena.free(a).unwrap();
        let b = arena.alloc(4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn memory_bytes_accounts_for_all_storage() {
        let mut arena = StorageArena::new();
        arena.alloc(16).unwrap();
        arena.alloc(4).unwrap();
        assert_eq!(arena.storage_count(), 2);
        assert_eq!(arena.memory_bytes(), 20 * 4);
    }

    #[test]
    #[allow(unsafe_code)]
    fn untracked_handles_always_pass_check() {
        let arena = StorageArena::new();
        // SAFETY: never dereferenced.
        let h = unsafe { MemoryHandle::from_raw_parts(0x10, 16) };
        assert!(arena.check(&h).is_ok());
    }
}
