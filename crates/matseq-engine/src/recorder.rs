//! The operation recorder: a builder that appends to a tape pair
//! instead of touching memory.
//!
//! Every builder call writes one opcode byte and the operand addresses
//! that opcode declares, in declared order, then returns the recorder
//! for chaining. Nothing is computed until the finished recorder has been
//! turned into a [`Sequence`](crate::Sequence) and invoked.

use indexmap::IndexSet;
use matseq_arena::MemoryHandle;
use matseq_core::{Opcode, OperandKind};
use matseq_tape::{Listing, TapeWriter};

use crate::config::RecorderConfig;
use crate::error::RecordError;

/// Anything that can stand in as an operand: a raw handle or another
/// recorder's own matrix.
pub trait Operand {
    /// The storage this operand addresses.
    fn memory_handle(&self) -> MemoryHandle;
}

impl Operand for MemoryHandle {
    fn memory_handle(&self) -> MemoryHandle {
        *self
    }
}

impl Operand for MatrixRecorder {
    fn memory_handle(&self) -> MemoryHandle {
        self.handle
    }
}

impl<T: Operand + ?Sized> Operand for &T {
    fn memory_handle(&self) -> MemoryHandle {
        (**self).memory_handle()
    }
}

/// Records operations against one 4×4 matrix.
///
/// The recorder never reads or writes the storage behind any handle it
/// is given; it only writes addresses.
#[derive(Debug)]
pub struct MatrixRecorder {
    handle: MemoryHandle,
    tape: TapeWriter,
    referenced: IndexSet<MemoryHandle>,
}

impl MatrixRecorder {
    /// Create a recorder for the matrix at `handle` with default sizing.
    pub fn new(handle: MemoryHandle) -> Result<Self, RecordError> {
        Self::with_config(handle, &RecorderConfig::default())
    }

    /// Create a recorder for the matrix at `handle`.
    pub fn with_config(handle: MemoryHandle, config: &RecorderConfig) -> Result<Self, RecordError> {
        config.validate()?;
        check_len(&handle, OperandKind::Target)?;
        let tape = TapeWriter::with_capacity(config.operation_bytes(), config.argument_words())?;
        tracing::debug!(
            handle = %handle,
            operation_bytes = config.operation_bytes(),
            argument_bytes = config.argument_bytes(),
            "recorder created"
        );
        Ok(Self {
            handle,
            tape,
            referenced: IndexSet::new(),
        })
    }

    /// Record `self = self × other`.
    pub fn mul_matrix(&mut self, other: &impl Operand) -> Result<&mut Self, RecordError> {
        let other = other.memory_handle();
        self.record(Opcode::MulMatrix, &[self.handle, other])
    }

    /// Record `vector = self × vector`.
    ///
    /// The vector is written to the argument tape before the matrix.
    pub fn mul_vector(&mut self, vector: &impl Operand) -> Result<&mut Self, RecordError> {
        let vector = vector.memory_handle();
        self.record(Opcode::MulVector, &[vector, self.handle])
    }

    /// Record an in-place transpose.
    pub fn transpose(&mut self) -> Result<&mut Self, RecordError> {
        self.record(Opcode::Transpose, &[self.handle])
    }

    /// Record an in-place inversion.
    ///
    /// Inverting a singular matrix is not an error; it fills the matrix
    /// with NaN when the sequence runs.
    pub fn invert(&mut self) -> Result<&mut Self, RecordError> {
        self.record(Opcode::Invert, &[self.handle])
    }

    fn record(
        &mut self,
        opcode: Opcode,
        operands: &[MemoryHandle],
    ) -> Result<&mut Self, RecordError> {
        for (handle, &kind) in operands.iter().zip(opcode.operands()) {
            check_len(handle, kind)?;
        }
        let mut words = [0u64; 2];
        for (slot, handle) in words.iter_mut().zip(operands) {
            *slot = handle.word();
        }
        self.tape.emit(opcode, &words[..operands.len()])?;
        self.referenced.extend(operands.iter().copied());
        tracing::trace!(
            opcode = opcode.mnemonic(),
            position = self.tape.len() - 1,
            "operation recorded"
        );
        Ok(self)
    }

    /// The recorder's own matrix.
    pub fn handle(&self) -> MemoryHandle {
        self.handle
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.tape.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// Distinct handles referenced so far, in first-use order.
    pub fn referenced(&self) -> impl Iterator<Item = &MemoryHandle> + '_ {
        self.referenced.iter()
    }

    /// Render the operations recorded so far.
    pub fn listing(&self) -> Listing<'_> {
        self.tape.listing()
    }

    /// The current opcode bytes.
    pub fn operation_bytes(&self) -> &[u8] {
        self.tape.operations().as_bytes()
    }

    /// The current argument bytes.
    pub fn argument_bytes(&self) -> &[u8] {
        self.tape.arguments().as_bytes()
    }

    pub(crate) fn into_parts(self) -> (TapeWriter, Vec<MemoryHandle>) {
        (self.tape, self.referenced.into_iter().collect())
    }
}

fn check_len(handle: &MemoryHandle, kind: OperandKind) -> Result<(), RecordError> {
    let required = kind.elements();
    if handle.len() < required {
        return Err(RecordError::StorageTooSmall {
            kind,
            required,
            available: handle.len(),
        });
    }
    Ok(())
}
