//! The two tapes and the writer that keeps them in step.

use matseq_arena::{FrozenBuffer, GrowableBuffer};
use matseq_core::{Opcode, WORD_SIZE};

use crate::codec::{write_u8, write_word};
use crate::error::TapeError;
use crate::listing::Listing;

/// One opcode byte per recorded instruction.
#[derive(Debug)]
pub struct OperationTape {
    buf: GrowableBuffer,
}

impl OperationTape {
    /// Create an empty tape with room for `capacity` opcodes.
    pub fn with_capacity(capacity: usize) -> Result<Self, TapeError> {
        Ok(Self {
            buf: GrowableBuffer::with_capacity(capacity)?,
        })
    }

    /// Make room for `additional` more opcodes.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TapeError> {
        Ok(self.buf.reserve(additional)?)
    }

    /// Append one opcode.
    pub fn push(&mut self, opcode: Opcode) -> Result<(), TapeError> {
        write_u8(&mut self.buf, opcode.byte())
    }

    /// Number of opcodes recorded.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no opcode has been recorded.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current capacity in opcodes.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The recorded opcode bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// Freeze for reading.
    pub fn freeze(self) -> FrozenBuffer {
        self.buf.finalize_for_reading()
    }
}

/// Operand addresses, one native-endian word each.
#[derive(Debug)]
pub struct ArgumentTape {
    buf: GrowableBuffer,
}

impl ArgumentTape {
    /// Create an empty tape with room for `words` operands.
    pub fn with_capacity(words: usize) -> Result<Self, TapeError> {
        Ok(Self {
            buf: GrowableBuffer::with_capacity(words.saturating_mul(WORD_SIZE))?,
        })
    }

    /// Make room for `words` more operand words.
    pub fn reserve_words(&mut self, words: usize) -> Result<(), TapeError> {
        Ok(self.buf.reserve(words.saturating_mul(WORD_SIZE))?)
    }

    /// Append one operand word.
    pub fn push(&mut self, word: u64) -> Result<(), TapeError> {
        write_word(&mut self.buf, word)
    }

    /// Number of words recorded.
    pub fn len(&self) -> usize {
        self.buf.len() / WORD_SIZE
    }

    /// Whether no word has been recorded.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current capacity in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.buf.capacity()
    }

    /// The recorded argument bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// Freeze for reading.
    pub fn freeze(self) -> FrozenBuffer {
        self.buf.finalize_for_reading()
    }
}

/// Appends instructions to an operation tape and an argument tape so
/// that the two never disagree about instruction boundaries.
#[derive(Debug)]
pub struct TapeWriter {
    operations: OperationTape,
    arguments: ArgumentTape,
}

impl TapeWriter {
    /// Create a writer with room for `operations` opcodes and
    /// `argument_words` operand words before the first growth.
    pub fn with_capacity(operations: usize, argument_words: usize) -> Result<Self, TapeError> {
        Ok(Self {
            operations: OperationTape::with_capacity(operations)?,
            arguments: ArgumentTape::with_capacity(argument_words)?,
        })
    }

    /// Make room for `operations` more opcodes and `words` more operand
    /// words. Either tape may have grown when this fails, but nothing is
    /// written to either.
    pub fn reserve(&mut self, operations: usize, words: usize) -> Result<(), TapeError> {
        self.operations.reserve(operations)?;
        self.arguments.reserve_words(words)
    }

    /// Record one instruction.
    ///
    /// `operands` must be in [`Opcode::operands`] order and have exactly
    /// [`Opcode::arity`] entries. Both tapes are sized before either is
    /// written, so on any error nothing is recorded.
    pub fn emit(&mut self, opcode: Opcode, operands: &[u64]) -> Result<(), TapeError> {
        if operands.len() != opcode.arity() {
            return Err(TapeError::ArityMismatch {
                opcode,
                expected: opcode.arity(),
                found: operands.len(),
            });
        }
        self.reserve(1, operands.len())?;
        self.operations.push(opcode)?;
        for &word in operands {
            self.arguments.push(word)?;
        }
        Ok(())
    }

    /// Number of instructions recorded.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether no instruction has been recorded.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The operation tape.
    pub fn operations(&self) -> &OperationTape {
        &self.operations
    }

    /// The argument tape.
    pub fn arguments(&self) -> &ArgumentTape {
        &self.arguments
    }

    /// Render the tapes recorded so far.
    pub fn listing(&self) -> Listing<'_> {
        Listing::new(self.operations.as_bytes(), self.arguments.as_bytes())
    }

    /// Freeze both tapes, returning `(operations, arguments)`.
    pub fn finish(self) -> (FrozenBuffer, FrozenBuffer) {
        (self.operations.freeze(), self.arguments.freeze())
    }
}
