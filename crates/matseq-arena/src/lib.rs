//! Growable byte buffers and generational `f32` storage for matseq.
//!
//! Two unrelated kinds of memory live here. [`GrowableBuffer`] is the
//! append-only byte store both tapes are written into. [`StorageArena`]
//! owns the `f32` regions that recorded operations address, and hands out
//! [`MemoryHandle`]s that remember which allocation and which relocation
//! generation an address was resolved against. This crate is one of two
//! that may contain `unsafe` code (along with `matseq-engine`).
//!
//! # Architecture
//!
//! ```text
//! StorageArena
//! └── IndexMap<StorageId, StorageEntry>
//!     └── RawRegion (leaked Box<[f32]>, never moves until resized/freed)
//!
//! MemoryHandle = raw element address + length + Option<StorageKey>
//! StorageKey   = StorageId + Generation
//! ```
//!
//! A handle stays valid until its storage is freed or resized. The arena
//! cannot stop a caller from keeping a stale handle, but
//! [`StorageArena::check`] detects one in O(1).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod growable;
pub mod handle;
mod raw;
pub mod storage;

// Public re-exports for the primary API surface.
pub use error::ArenaError;
pub use growable::{FrozenBuffer, GrowableBuffer};
pub use handle::{address_of, MemoryHandle, StorageKey};
pub use storage::StorageArena;
