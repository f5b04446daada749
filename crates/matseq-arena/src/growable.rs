//! Append-only byte buffers with doubling growth.
//!
//! A [`GrowableBuffer`] is the write side of a tape: a pre-sized byte
//! region with a cursor that advances on each append. When an append
//! would run past the end, capacity doubles (repeatedly, if one doubling
//! is not enough) and the written prefix is carried over. Once recording
//! ends, [`GrowableBuffer::finalize_for_reading`] converts it into a
//! [`FrozenBuffer`] that exposes exactly the written bytes.

use crate::error::ArenaError;

/// A growable, append-only byte buffer.
///
/// The backing `Vec<u8>` is always sized to the full capacity; `cursor`
/// marks how much of it has been written. Capacity never shrinks.
#[derive(Debug)]
pub struct GrowableBuffer {
    /// Backing storage. `data.len()` is the capacity.
    data: Vec<u8>,
    /// Next free byte.
    cursor: usize,
    /// Number of reallocations performed so far.
    grow_count: u32,
}

impl GrowableBuffer {
    /// Create a buffer with the given initial capacity in bytes.
    ///
    /// A zero capacity is accepted; the first append grows it.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| ArenaError::AllocationFailed {
                requested: capacity,
                capacity: 0,
            })?;
        data.resize(capacity, 0);
        Ok(Self {
            data,
            cursor: 0,
            grow_count: 0,
        })
    }

    /// Append `bytes` at the cursor, growing first if they do not fit.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), ArenaError> {
        if self.remaining() < bytes.len() {
            self.grow(bytes.len())?;
        }
        let end = self.cursor + bytes.len();
        self.data[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(())
    }

    /// Make sure `additional` more bytes fit without growing again.
    ///
    /// On failure nothing is written and the cursor does not move.
    pub fn reserve(&mut self, additional: usize) -> Result<(), ArenaError> {
        if self.remaining() < additional {
            self.grow(additional)?;
        }
        Ok(())
    }

    /// Double capacity until `needed` more bytes fit after the cursor.
    fn grow(&mut self, needed: usize) -> Result<(), ArenaError> {
        let old_capacity = self.data.len();
        let required = self
            .cursor
            .checked_add(needed)
            .ok_or(ArenaError::AllocationFailed {
                requested: usize::MAX,
                capacity: old_capacity,
            })?;

        let overflow = ArenaError::AllocationFailed {
            requested: required,
            capacity: old_capacity,
        };
        let mut new_capacity = match old_capacity {
            0 => 1,
            n => n.checked_mul(2).ok_or(overflow.clone())?,
        };
        while new_capacity < required {
            new_capacity = new_capacity.checked_mul(2).ok_or(overflow.clone())?;
        }

        self.data
            .try_reserve_exact(new_capacity - old_capacity)
            .map_err(|_| ArenaError::AllocationFailed {
                requested: new_capacity,
                capacity: old_capacity,
            })?;
        self.data.resize(new_capacity, 0);
        self.grow_count += 1;
        tracing::trace!(old_capacity, new_capacity, "buffer grew");
        Ok(())
    }

    /// Number of bytes that can be appended without growing.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.cursor
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Number of reallocations so far.
    pub fn grow_count(&self) -> u32 {
        self.grow_count
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// Flip into read mode: the result exposes exactly the written bytes.
    ///
    /// Truncation keeps the existing allocation, so no bytes are copied.
    pub fn finalize_for_reading(mut self) -> FrozenBuffer {
        self.data.truncate(self.cursor);
        FrozenBuffer { data: self.data }
    }
}

/// A read-only view of a finished [`GrowableBuffer`].
///
/// The contents can no longer change, so [`as_ptr`](Self::as_ptr) stays
/// stable for the lifetime of the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrozenBuffer {
    data: Vec<u8>,
}

impl FrozenBuffer {
    /// The frozen bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Base address of the frozen bytes.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Number of frozen bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for FrozenBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_within_capacity_does_not_grow() {
        let mut buf = GrowableBuffer::with_capacity(8).unwrap();
        buf.append(&[1, 2, 3]).unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.remaining(), 5);
        assert_eq!(buf.grow_count(), 0);
    }

    #[test]
    fn overflow_doubles_capacity() {
        let mut buf = GrowableBuffer::with_capacity(4).unwrap();
        buf.append(&[0; 4]).unwrap();
        buf.append(&[9]).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.grow_count(), 1);
    }

    #[test]
    fn large_append_doubles_until_it_fits() {
        let mut buf = GrowableBuffer::with_capacity(2).unwrap();
        buf.append(&[7; 9]).unwrap();
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.as_bytes(), &[7; 9]);
    }

    #[test]
    fn zero_capacity_grows_on_first_append() {
        let mut buf = GrowableBuffer::with_capacity(0).unwrap();
        assert_eq!(buf.capacity(), 0);
        buf.append(&[1, 2, 3]).unwrap();
        assert!(buf.capacity() >= 3);
        assert_eq!(buf.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn growth_preserves_prefix_and_cursor() {
        let mut buf = GrowableBuffer::with_capacity(3).unwrap();
        buf.append(&[1, 2, 3]).unwrap();
        buf.append(&[4, 5]).unwrap();
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4, 5]);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn reserve_within_capacity_does_not_grow() {
        let mut buf = GrowableBuffer::with_capacity(8).unwrap();
        buf.append(&[1, 2]).unwrap();
        buf.reserve(6).unwrap();
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.grow_count(), 0);
    }

    #[test]
    fn reserve_grows_once_so_appends_fit() {
        let mut buf = GrowableBuffer::with_capacity(4).unwrap();
        buf.append(&[1, 2, 3]).unwrap();
        buf.reserve(10).unwrap();
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.grow_count(), 1);
        buf.append(&[0; 10]).unwrap();
        assert_eq!(buf.grow_count(), 1);
        assert_eq!(&buf.as_bytes()[..3], &[1, 2, 3]);
    }

    #[test]
    fn failed_reserve_leaves_contents_alone() {
        let mut buf = GrowableBuffer::with_capacity(4).unwrap();
        buf.append(&[5, 6]).unwrap();
        let err = buf.reserve(usize::MAX).unwrap_err();
        assert!(matches!(err, ArenaError::AllocationFailed { .. }));
        assert_eq!(buf.as_bytes(), &[5, 6]);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.grow_count(), 0);
    }

    #[test]
    fn finalize_exposes_exactly_written_bytes() {
        let mut buf = GrowableBuffer::with_capacity(64).unwrap();
        buf.append(&[0xAA, 0xBB]).unwrap();
        let frozen = buf.finalize_for_reading();
        assert_eq!(frozen.len(), 2);
        assert_eq!(frozen.as_bytes(), &[0xAA, 0xBB]);
    }

    #[test]
    fn finalize_empty_buffer() {
        let buf = GrowableBuffer::with_capacity(8).unwrap();
        let frozen = buf.finalize_for_reading();
        assert!(frozen.is_empty());
    }

    #[test]
    fn frozen_from_vec() {
        let frozen = FrozenBuffer::from(vec![1, 2, 3]);
        assert_eq!(frozen.as_bytes(), &[1, 2, 3]);
        assert!(!frozen.as_ptr().is_null());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn appends_never_lose_bytes(
                initial in 0usize..16,
                chunks in proptest::collection::vec(
                    proptest::collection::vec(any::<u8>(), 0..40),
                    0..32,
                ),
            ) {
                let mut buf = GrowableBuffer::with_capacity(initial).unwrap();
                let mut expected = Vec::new();
                for chunk in &chunks {
                    buf.append(chunk).unwrap();
                    expected.extend_from_slice(chunk);
                    prop_assert_eq!(buf.as_bytes(), expected.as_slice());
                }
                prop_assert!(buf.capacity() >= buf.len());
                let finalized = buf.finalize_for_reading();
                prop_assert_eq!(finalized.as_bytes(), expected.as_slice());
            }

            #[test]
            fn growth_at_least_doubles(
                initial in 1usize..16,
                chunk_len in 1usize..64,
            ) {
                let mut buf = GrowableBuffer::with_capacity(initial).unwrap();
                buf.append(&vec![0u8; initial]).unwrap();
                let before = buf.capacity();
                buf.append(&vec![1u8; chunk_len]).unwrap();
                prop_assert!(buf.capacity() >= before * 2);
                prop_assert!(buf.capacity() >= initial + chunk_len);
            }
        }
    }
}
