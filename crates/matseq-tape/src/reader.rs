//! Lock-step replay of a tape pair.
//!
//! [`InstructionIter`] walks the operation tape one byte at a time and,
//! for each opcode, consumes exactly [`Opcode::arity`] words from the
//! argument tape. Any disagreement between the two tapes surfaces as a
//! [`TapeError`] and ends the iteration.

use matseq_core::{Opcode, OperandKind, WORD_SIZE};
use smallvec::SmallVec;

use crate::codec::read_word;
use crate::error::TapeError;

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Offset of the opcode in the operation tape.
    pub position: usize,
    /// The opcode.
    pub opcode: Opcode,
    /// Operand words, in argument-tape order.
    pub operands: SmallVec<[u64; 2]>,
}

impl Instruction {
    /// The operand word playing `kind`, if the opcode has one.
    pub fn operand(&self, kind: OperandKind) -> Option<u64> {
        self.opcode
            .operands()
            .iter()
            .position(|&k| k == kind)
            .and_then(|i| self.operands.get(i).copied())
    }

    /// The address of the recorder's own matrix.
    pub fn target(&self) -> Option<u64> {
        self.operand(OperandKind::Target)
    }
}

/// Iterator over the instructions of a tape pair.
pub struct InstructionIter<'a> {
    operations: &'a [u8],
    arguments: &'a [u8],
    position: usize,
    arg_cursor: usize,
    done: bool,
}

impl<'a> InstructionIter<'a> {
    /// Start replaying `operations` against `arguments`.
    pub fn new(operations: &'a [u8], arguments: &'a [u8]) -> Self {
        Self {
            operations,
            arguments,
            position: 0,
            arg_cursor: 0,
            done: false,
        }
    }

    fn step(&mut self) -> Option<Result<Instruction, TapeError>> {
        let Some(&tag) = self.operations.get(self.position) else {
            let extra_bytes = self.arguments.len() - self.arg_cursor;
            if extra_bytes != 0 {
                return Some(Err(TapeError::TrailingArguments { extra_bytes }));
            }
            return None;
        };
        let position = self.position;
        let Some(opcode) = Opcode::from_byte(tag) else {
            return Some(Err(TapeError::UnknownOpcode { tag, position }));
        };

        let needed = opcode.argument_bytes();
        let available = self.arguments.len() - self.arg_cursor;
        if available < needed {
            return Some(Err(TapeError::TruncatedArguments {
                position,
                opcode,
                needed,
                available,
            }));
        }

        let mut operands = SmallVec::new();
        for i in 0..opcode.arity() {
            // Length was checked above.
            if let Some(word) = read_word(self.arguments, self.arg_cursor + i * WORD_SIZE) {
                operands.push(word);
            }
        }
        self.arg_cursor += needed;
        self.position += 1;
        Some(Ok(Instruction {
            position,
            opcode,
            operands,
        }))
    }
}

impl Iterator for InstructionIter<'_> {
    type Item = Result<Instruction, TapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.step();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

/// Decode a whole tape pair.
pub fn decode(operations: &[u8], arguments: &[u8]) -> Result<Vec<Instruction>, TapeError> {
    InstructionIter::new(operations, arguments).collect()
}

/// Number of argument bytes an operation tape implies.
///
/// Used to check that an argument tape fits an operation tape before
/// the two are handed to generated code.
pub fn expected_argument_bytes(operations: &[u8]) -> Result<usize, TapeError> {
    operations
        .iter()
        .enumerate()
        .try_fold(0usize, |total, (position, &tag)| {
            Opcode::from_byte(tag)
                .map(|op| total + op.argument_bytes())
                .ok_or(TapeError::UnknownOpcode { tag, position })
        })
}
