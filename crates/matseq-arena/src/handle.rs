//! Memory handles and the address primitive.
//!
//! A [`MemoryHandle`] is an observed address, not an owner. Handles
//! resolved through a [`StorageArena`](crate::StorageArena) carry a
//! [`StorageKey`] so staleness can be detected; handles built from raw
//! parts carry none and are entirely the caller's responsibility.

use std::fmt;

use matseq_core::{Generation, StorageId};

/// Returns the address of `buffer[position]`.
///
/// Equivalent to the buffer's base address plus `position` scaled by the
/// four-byte `f32` element size. `position` may equal `buffer.len()`
/// (one past the end) but is not otherwise bounds-checked.
pub fn address_of(buffer: &[f32], position: usize) -> usize {
    buffer.as_ptr() as usize + position * std::mem::size_of::<f32>()
}

/// Which arena allocation, at which relocation generation, a handle
/// was resolved against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StorageKey {
    /// The allocation.
    pub storage: StorageId,
    /// Its generation when the handle was resolved.
    pub generation: Generation,
}

/// A non-owning reference to the first element of an `f32` region.
///
/// Copying a handle copies the address; it does not extend the lifetime
/// of the storage behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct MemoryHandle {
    addr: usize,
    len: u32,
    key: Option<StorageKey>,
}

impl MemoryHandle {
    /// Create a handle tracked by an arena.
    pub(crate) fn tracked(addr: usize, len: u32, key: StorageKey) -> Self {
        Self {
            addr,
            len,
            key: Some(key),
        }
    }

    /// Create an untracked handle to caller-managed storage.
    ///
    /// # Safety
    ///
    /// `addr` must be the address of `len` contiguous, `f32`-aligned
    /// elements that stay allocated, unmoved, and otherwise unaliased
    /// whenever a sequence referencing this handle is invoked. No arena
    /// will ever check this handle.
    #[allow(unsafe_code)]
    pub unsafe fn from_raw_parts(addr: usize, len: u32) -> Self {
        Self {
            addr,
            len,
            key: None,
        }
    }

    /// Address of the first element.
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// The address as an argument-tape word.
    pub fn word(&self) -> u64 {
        self.addr as u64
    }

    /// Length of the region in `f32` elements.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the region is zero-length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The arena key, or `None` for caller-managed storage.
    pub fn key(&self) -> Option<StorageKey> {
        self.key
    }

    /// Whether an arena can check this handle.
    pub fn is_tracked(&self) -> bool {
        self.key.is_some()
    }

    /// A handle to `len` elements starting `offset` elements in.
    ///
    /// Returns `None` if the view does not fit inside this handle.
    pub fn sub_view(&self, offset: u32, len: u32) -> Option<MemoryHandle> {
        let end = offset.checked_add(len)?;
        if end > self.len {
            return None;
        }
        Some(Self {
            addr: self.addr + offset as usize * std::mem::size_of::<f32>(),
            len,
            key: self.key,
        })
    }
}

impl fmt::Display for MemoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            Some(key) => write!(
                f,
                "MemoryHandle({:#x}, len={}, storage={}, gen={})",
                self.addr, self.len, key.storage, key.generation
            ),
            None => write!(f, "MemoryHandle({:#x}, len={}, untracked)", self.addr, self.len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_of_scales_position() {
        let data = [0.0f32; 8];
        let base = data.as_ptr() as usize;
        assert_eq!(address_of(&data, 0), base);
        assert_eq!(address_of(&data, 5), base + 20);
    }

    #[test]
    fn sub_view_offsets_address() {
        let key = StorageKey {
            storage: StorageId::next(),
            generation: Generation(0),
        };
        let h = MemoryHandle::tracked(0x1000, 32, key);
        let v = h.sub_view(16, 16).unwrap();
        assert_eq!(v.addr(), 0x1040);
        assert_eq!(v.len(), 16);
        assert_eq!(v.key(), Some(key));
    }

    #[test]
    fn sub_view_rejects_overrun() {
        let key = StorageKey {
            storage: StorageId::next(),
            generation: Generation(0),
        };
        let h = MemoryHandle::tracked(0x1000, 16, key);
        assert!(h.sub_view(8, 9).is_none());
        assert!(h.sub_view(u32::MAX, 2).is_none());
    }

    #[test]
    #[allow(unsafe_code)]
    fn untracked_handle_has_no_key() {
        // SAFETY: the handle is never used to access memory.
        let h = unsafe { MemoryHandle::from_raw_parts(0x2000, 4) };
        assert!(!h.is_tracked());
        assert_eq!(h.word(), 0x2000);
        assert!(h.to_string().contains("untracked"));
    }
}
