//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use matseq_core::{Generation, StorageId};

/// Errors that can occur during buffer growth or storage access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The allocator could not provide the requested memory.
    AllocationFailed {
        /// Number of bytes requested.
        requested: usize,
        /// Capacity in bytes before the failed request.
        capacity: usize,
    },
    /// A `StorageId` that is not registered in the arena (never
    /// allocated here, or already freed).
    UnknownStorage {
        /// The unrecognised storage.
        storage: StorageId,
    },
    /// A `MemoryHandle` resolved before its storage was moved.
    StaleHandle {
        /// The storage the handle points into.
        storage: StorageId,
        /// The generation encoded in the handle.
        handle_generation: Generation,
        /// The storage's current generation.
        current_generation: Generation,
    },
    /// A requested view does not fit inside its storage.
    OutOfBounds {
        /// The storage the view was requested from.
        storage: StorageId,
        /// First element of the view.
        offset: u32,
        /// Length of the view in elements.
        len: u32,
        /// Length of the storage in elements.
        storage_len: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "allocation failed: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::UnknownStorage { storage } => write!(f, "unknown storage: {storage}"),
            Self::StaleHandle {
                storage,
                handle_generation,
                current_generation,
            } => {
                write!(
                    f,
                    "stale handle into storage {storage}: generation {handle_generation}, \
                     current {current_generation}"
                )
            }
            Self::OutOfBounds {
                storage,
                offset,
                len,
                storage_len,
            } => {
                write!(
                    f,
                    "view [{offset}, {offset}+{len}) exceeds storage {storage} of {storage_len} elements"
                )
            }
        }
    }
}

impl Error for ArenaError {}
