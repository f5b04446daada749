//! Recording and dispatch error types.

use std::error::Error;
use std::fmt;

use matseq_arena::ArenaError;
use matseq_core::{GenerateError, OperandKind};
use matseq_tape::TapeError;

use crate::config::ConfigError;

/// Errors from [`MatrixRecorder`](crate::MatrixRecorder) construction
/// and builder calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// The recorder configuration is invalid.
    Config(ConfigError),
    /// A tape could not be written (allocation failure).
    Tape(TapeError),
    /// An operand's storage is shorter than its role requires.
    StorageTooSmall {
        /// The role the operand plays.
        kind: OperandKind,
        /// Elements the role requires.
        required: u32,
        /// Elements the handle covers.
        available: u32,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Tape(e) => write!(f, "tape: {e}"),
            Self::StorageTooSmall {
                kind,
                required,
                available,
            } => {
                write!(
                    f,
                    "{kind} operand needs {required} elements, handle covers {available}"
                )
            }
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Tape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RecordError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TapeError> for RecordError {
    fn from(e: TapeError) -> Self {
        Self::Tape(e)
    }
}

/// Errors from [`DispatchBridge::terminate`](crate::DispatchBridge::terminate)
/// and [`Sequence`](crate::Sequence) binding and invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The recorder has no instructions.
    EmptyTape,
    /// The tape pair does not decode.
    Tape(TapeError),
    /// The code generator could not produce a routine.
    Generate(GenerateError),
    /// The sequence has no argument tape bound.
    Unbound,
    /// An argument tape's length does not match the operation tape.
    ArgumentLayoutMismatch {
        /// Bytes the operation tape implies.
        expected: usize,
        /// Bytes supplied.
        found: usize,
    },
    /// A rebinding supplied the wrong number of operands.
    OperandCountMismatch {
        /// Operand words the operation tape implies.
        expected: usize,
        /// Handles supplied.
        found: usize,
    },
    /// A rebinding operand is shorter than its role requires.
    StorageTooSmall {
        /// The role the operand plays.
        kind: OperandKind,
        /// Elements the role requires.
        required: u32,
        /// Elements the handle covers.
        available: u32,
    },
    /// Referenced storage was freed or moved since recording.
    Storage(ArenaError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTape => write!(f, "cannot terminate an empty recorder"),
            Self::Tape(e) => write!(f, "tape: {e}"),
            Self::Generate(e) => write!(f, "generator: {e}"),
            Self::Unbound => write!(f, "sequence has no argument tape bound"),
            Self::ArgumentLayoutMismatch { expected, found } => {
                write!(
                    f,
                    "argument tape is {found} bytes, operation tape expects {expected}"
                )
            }
            Self::OperandCountMismatch { expected, found } => {
                write!(f, "expected {expected} operands, got {found}")
            }
            Self::StorageTooSmall {
                kind,
                required,
                available,
            } => {
                write!(
                    f,
                    "{kind} operand needs {required} elements, handle covers {available}"
                )
            }
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tape(e) => Some(e),
            Self::Generate(e) => Some(e),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TapeError> for DispatchError {
    fn from(e: TapeError) -> Self {
        Self::Tape(e)
    }
}

impl From<GenerateError> for DispatchError {
    fn from(e: GenerateError) -> Self {
        Self::Generate(e)
    }
}

impl From<ArenaError> for DispatchError {
    fn from(e: ArenaError) -> Self {
        Self::Storage(e)
    }
}
