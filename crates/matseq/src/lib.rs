//! matseq: record 4×4 matrix and vector operations now, run them later.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all matseq sub-crates. For most users, adding `matseq` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use matseq::prelude::*;
//!
//! let mut arena = StorageArena::new();
//! let m = arena.alloc_from(&matseq::engine::kernels::IDENTITY).unwrap();
//! let v = arena.alloc_from(&[1.0, 2.0, 3.0, 1.0]).unwrap();
//!
//! // Record: nothing is computed yet.
//! let mut rec = MatrixRecorder::new(arena.whole(m).unwrap()).unwrap();
//! rec.transpose().unwrap()
//!     .transpose().unwrap()
//!     .mul_vector(&arena.whole(v).unwrap()).unwrap();
//! print!("{}", rec.listing());
//!
//! // Compile once, invoke as often as needed.
//! let seq = DispatchBridge::interpreting().terminate(rec).unwrap();
//! arena.write(m).unwrap()[13] = 5.0; // translate y by 5
//! seq.invoke(&mut arena).unwrap();
//! assert_eq!(arena.read(v).unwrap(), &[1.0, 7.0, 3.0, 1.0]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `matseq-core` | Opcodes, storage IDs, generator traits |
//! | [`arena`] | `matseq-arena` | Growable buffers, storage arena, memory handles |
//! | [`tape`] | `matseq-tape` | Tape writing, decoding, and listings |
//! | [`engine`] | `matseq-engine` | Recorder, dispatch bridge, sequences, generators |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Opcodes, storage identifiers, and the generator seam (`matseq-core`).
pub use matseq_core as types;

/// Growable buffers, storage arena, and memory handles (`matseq-arena`).
///
/// [`arena::StorageArena`] owns the `f32` storage sequences address;
/// [`arena::address_of`] is the raw address primitive.
pub use matseq_arena as arena;

/// Operation and argument tapes (`matseq-tape`).
///
/// [`tape::decode`] and [`tape::Listing`] are useful when inspecting what
/// a recorder or sequence holds.
pub use matseq_tape as tape;

/// Recording, compiling, and invoking (`matseq-engine`).
pub use matseq_engine as engine;

/// Common imports for typical matseq usage.
///
/// ```rust
/// use matseq::prelude::*;
/// ```
pub mod prelude {
    // Storage
    pub use matseq_arena::{MemoryHandle, StorageArena};

    // Core types and traits
    pub use matseq_core::{CodeGenerator, Opcode, Routine, StorageId};

    // Errors
    pub use matseq_arena::ArenaError;
    pub use matseq_core::GenerateError;
    pub use matseq_engine::{DispatchError, RecordError};

    // Engine
    pub use matseq_engine::{
        DispatchBridge, InterpretingGenerator, MatrixRecorder, Operand, RecorderConfig, Sequence,
    };
}
