//! Error types for tape encoding and decoding.

use std::error::Error;
use std::fmt;

use matseq_arena::ArenaError;
use matseq_core::Opcode;

/// Errors that can occur while writing or replaying a tape pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TapeError {
    /// A tape buffer could not grow.
    Arena(ArenaError),
    /// An instruction was emitted with the wrong number of operands.
    ArityMismatch {
        /// The opcode being emitted.
        opcode: Opcode,
        /// Operands its table entry declares.
        expected: usize,
        /// Operands supplied.
        found: usize,
    },
    /// The operation tape contains a byte that is not an opcode.
    UnknownOpcode {
        /// The unrecognised byte.
        tag: u8,
        /// Its offset in the operation tape.
        position: usize,
    },
    /// The argument tape ends before an instruction's operands do.
    TruncatedArguments {
        /// Offset of the instruction in the operation tape.
        position: usize,
        /// The instruction's opcode.
        opcode: Opcode,
        /// Argument bytes the instruction needs.
        needed: usize,
        /// Argument bytes left.
        available: usize,
    },
    /// Argument bytes remain after the last instruction was replayed.
    TrailingArguments {
        /// Number of unconsumed bytes.
        extra_bytes: usize,
    },
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "tape buffer: {e}"),
            Self::ArityMismatch {
                opcode,
                expected,
                found,
            } => {
                write!(f, "{opcode} takes {expected} operands, got {found}")
            }
            Self::UnknownOpcode { tag, position } => {
                write!(f, "unknown opcode {tag:#04x} at offset {position}")
            }
            Self::TruncatedArguments {
                position,
                opcode,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated arguments for {opcode} at offset {position}: \
                     need {needed} bytes, {available} available"
                )
            }
            Self::TrailingArguments { extra_bytes } => {
                write!(f, "{extra_bytes} argument bytes left after the last instruction")
            }
        }
    }
}

impl Error for TapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for TapeError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
