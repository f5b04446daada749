//! Core types and traits for the matseq recorder.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other matseq crate: the opcode set and
//! its arity table, storage identifiers, generator errors, and the
//! [`CodeGenerator`]/[`Routine`] seam between a finished tape and the
//! code that executes it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod id;
pub mod opcode;
pub mod traits;

pub use error::GenerateError;
pub use id::{Generation, StorageId};
pub use opcode::{Opcode, OperandKind, MATRIX_ELEMENTS, VECTOR_ELEMENTS, WORD_SIZE};
pub use traits::{CodeGenerator, Routine};
