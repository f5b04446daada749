//! Error types shared across the generator boundary.

use std::error::Error;
use std::fmt;

/// Errors a [`CodeGenerator`](crate::CodeGenerator) reports when it cannot
/// produce a routine for a tape.
///
/// Every variant is fatal for the compile attempt that produced it: no
/// partial routine exists and nothing is retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
    /// The tape contains a byte that is not a supported opcode.
    UnsupportedOpcode {
        /// The unrecognised byte.
        tag: u8,
        /// Byte offset of the opcode within the operation tape.
        position: usize,
    },
    /// The generator refused the tape for a reason of its own
    /// (resource exhaustion, external compiler failure, ...).
    Rejected {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOpcode { tag, position } => {
                write!(f, "unsupported opcode {tag:#04x} at offset {position}")
            }
            Self::Rejected { reason } => write!(f, "code generation rejected: {reason}"),
        }
    }
}

impl Error for GenerateError {}
