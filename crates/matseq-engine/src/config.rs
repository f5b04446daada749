//! Recorder configuration and validation.

use std::error::Error;
use std::fmt;

use matseq_core::WORD_SIZE;

// ── RecorderConfig ─────────────────────────────────────────────────

/// Initial tape sizing for a [`MatrixRecorder`](crate::MatrixRecorder).
///
/// Both tapes grow by doubling, so these values only decide how many
/// instructions fit before the first reallocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Opcodes the operation tape holds before growing. Default: 8.
    pub initial_operations: usize,
    /// Argument words reserved per initial operation. Default: 2, the
    /// widest arity in the opcode set.
    pub argument_words_per_operation: usize,
}

impl RecorderConfig {
    /// Default initial operation count.
    pub const DEFAULT_INITIAL_OPERATIONS: usize = 8;

    /// Default argument words per operation.
    pub const DEFAULT_ARGUMENT_WORDS_PER_OPERATION: usize = 2;

    /// Create a config sized for `initial_operations` instructions.
    pub fn new(initial_operations: usize) -> Self {
        Self {
            initial_operations,
            argument_words_per_operation: Self::DEFAULT_ARGUMENT_WORDS_PER_OPERATION,
        }
    }

    /// Initial operation tape size in bytes.
    pub fn operation_bytes(&self) -> usize {
        self.initial_operations
    }

    /// Initial argument tape size in words.
    pub fn argument_words(&self) -> usize {
        self.initial_operations
            .saturating_mul(self.argument_words_per_operation)
    }

    /// Initial argument tape size in bytes.
    pub fn argument_bytes(&self) -> usize {
        self.argument_words().saturating_mul(WORD_SIZE)
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_operations == 0 {
            return Err(ConfigError::ZeroOperationCapacity);
        }
        if self.argument_words_per_operation == 0 {
            return Err(ConfigError::ZeroArgumentWords);
        }
        let overflows = self
            .initial_operations
            .checked_mul(self.argument_words_per_operation)
            .and_then(|w| w.checked_mul(WORD_SIZE))
            .is_none();
        if overflows {
            return Err(ConfigError::CapacityOverflow {
                initial_operations: self.initial_operations,
                argument_words_per_operation: self.argument_words_per_operation,
            });
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_OPERATIONS)
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`RecorderConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `initial_operations` is zero.
    ZeroOperationCapacity,
    /// `argument_words_per_operation` is zero.
    ZeroArgumentWords,
    /// The argument tape size does not fit in `usize`.
    CapacityOverflow {
        /// The configured operation count.
        initial_operations: usize,
        /// The configured words per operation.
        argument_words_per_operation: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroOperationCapacity => write!(f, "initial_operations must be at least 1"),
            Self::ZeroArgumentWords => {
                write!(f, "argument_words_per_operation must be at least 1")
            }
            Self::CapacityOverflow {
                initial_operations,
                argument_words_per_operation,
            } => {
                write!(
                    f,
                    "argument tape of {initial_operations} x {argument_words_per_operation} \
                     words overflows usize"
                )
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_eight_operations_of_two_words() {
        let config = RecorderConfig::default();
        assert_eq!(config.operation_bytes(), 8);
        assert_eq!(config.argument_words(), 16);
        assert_eq!(config.argument_bytes(), 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_operations_rejected() {
        let config = RecorderConfig::new(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroOperationCapacity));
    }

    #[test]
    fn zero_argument_words_rejected() {
        let config = RecorderConfig {
            initial_operations: 4,
            argument_words_per_operation: 0,
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroArgumentWords));
    }

    #[test]
    fn overflow_rejected() {
        let config = RecorderConfig {
            initial_operations: usize::MAX / 2,
            argument_words_per_operation: 4,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityOverflow { .. })
        ));
    }
}
