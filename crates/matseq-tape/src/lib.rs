//! Opcode and argument tape encoding for matseq.
//!
//! A recorded sequence is two parallel byte streams. The operation tape
//! holds one opcode byte per instruction. The argument tape holds each
//! instruction's operand addresses as native-endian 8-byte words. There
//! is no length table: readers recover instruction boundaries by
//! replaying both tapes with [`Opcode::arity`](matseq_core::Opcode::arity).
//!
//! # Architecture
//!
//! - [`TapeWriter`] appends instructions to an [`OperationTape`] and an
//!   [`ArgumentTape`] in lock-step
//! - [`decode`] and [`InstructionIter`] replay a finished pair of tapes
//! - [`Listing`] renders a tape pair as text
//!
//! # Format
//!
//! ```text
//! operations: [op 0][op 1] ... [op N-1]              (1 byte each)
//! arguments:  [words of op 0][words of op 1] ...     (8 bytes per word)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod listing;
pub mod reader;
pub mod tape;

pub use error::TapeError;
pub use listing::Listing;
pub use reader::{decode, expected_argument_bytes, Instruction, InstructionIter};
pub use tape::{ArgumentTape, OperationTape, TapeWriter};
