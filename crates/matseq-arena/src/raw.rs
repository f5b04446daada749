//! Low-level primitives for arena memory.
//!
//! [`RawRegion`] owns a heap `[f32]` through a raw pointer instead of a
//! `Box`, so that addresses handed out to tapes and every later slice
//! borrow derive from the same pointer. The region never moves while it
//! is alive; relocation means allocating a new region and dropping this
//! one.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use crate::error::ArenaError;

/// An owned, fixed-size, zero-initialised `f32` allocation.
pub(crate) struct RawRegion {
    ptr: NonNull<[f32]>,
}

impl RawRegion {
    /// Allocate `len` zeroed elements.
    pub(crate) fn zeroed(len: usize) -> Result<Self, ArenaError> {
        let bytes = len.saturating_mul(std::mem::size_of::<f32>());
        let mut data: Vec<f32> = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ArenaError::AllocationFailed {
                requested: bytes,
                capacity: 0,
            })?;
        data.resize(len, 0.0);
        let boxed = data.into_boxed_slice();
        Ok(Self {
            ptr: NonNull::from(Box::leak(boxed)),
        })
    }

    /// Number of elements.
    pub(crate) fn len(&self) -> usize {
        self.ptr.len()
    }

    /// Address of element `offset`. Does not dereference.
    pub(crate) fn element_addr(&self, offset: usize) -> usize {
        self.ptr.cast::<f32>().as_ptr().wrapping_add(offset) as usize
    }

    pub(crate) fn as_slice(&self) -> &[f32] {
        // SAFETY: `ptr` came from `Box::leak` and is only released in
        // `Drop`; the shared borrow is tied to `&self`.
        unsafe { self.ptr.as_ref() }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        // SAFETY: as above; `&mut self` guarantees exclusivity among
        // safe borrows.
        unsafe { self.ptr.as_mut() }
    }
}

impl Drop for RawRegion {
    fn drop(&mut self) {
        // SAFETY: `ptr` was produced by `Box::leak` on a `Box<[f32]>` and
        // has not been freed; this is the only place it is reclaimed.
        unsafe { drop(Box::from_raw(self.ptr.as_ptr())) }
    }
}
