//! Compiled, repeatedly invocable sequences.
//!
//! A [`Sequence`] pairs a generated [`Routine`] with the frozen
//! operation tape it was compiled from and, while bound, the argument
//! tape it runs against.
//!
//! # State machine
//!
//! ```text
//!            bind / bind_arguments
//! Unbound ───────────────────────────▶ Bound ──┐ invoke
//!    ▲                                  │  ▲   │ (repeatable)
//!    └──────────── unbind ──────────────┘  └───┘
//! ```
//!
//! [`DispatchBridge::terminate`](crate::DispatchBridge::terminate) hands
//! out sequences already bound to the recorder's own argument tape.
//! Invocation never changes the sequence itself, only the storage its
//! arguments address.

use std::fmt;

use indexmap::IndexSet;
use matseq_arena::{FrozenBuffer, MemoryHandle, StorageArena};
use matseq_core::{OperandKind, Routine, WORD_SIZE};
use matseq_tape::{ArgumentTape, Listing};

use crate::error::DispatchError;

/// A compiled tape plus its bound arguments.
pub struct Sequence {
    routine: Box<dyn Routine>,
    operations: FrozenBuffer,
    /// Operand roles in argument-tape order.
    layout: Vec<OperandKind>,
    arguments: Option<FrozenBuffer>,
    /// Distinct handles the bound arguments address. Empty after an
    /// unchecked rebinding.
    referenced: Vec<MemoryHandle>,
}

impl Sequence {
    pub(crate) fn new(
        routine: Box<dyn Routine>,
        operations: FrozenBuffer,
        layout: Vec<OperandKind>,
        arguments: FrozenBuffer,
        referenced: Vec<MemoryHandle>,
    ) -> Self {
        Self {
            routine,
            operations,
            layout,
            arguments: Some(arguments),
            referenced,
        }
    }

    /// Whether an argument tape is bound.
    pub fn is_bound(&self) -> bool {
        self.arguments.is_some()
    }

    /// Number of compiled operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the sequence has no operations. Never true for a
    /// sequence produced by a bridge.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The frozen operation tape.
    pub fn opcodes(&self) -> &[u8] {
        self.operations.as_bytes()
    }

    /// The bound argument tape, if any.
    pub fn arguments(&self) -> Option<&[u8]> {
        self.arguments.as_ref().map(FrozenBuffer::as_bytes)
    }

    /// Operand roles, one per argument word, in tape order.
    pub fn layout(&self) -> &[OperandKind] {
        &self.layout
    }

    /// Size in bytes an argument tape must have to bind.
    pub fn argument_len(&self) -> usize {
        self.layout.len() * WORD_SIZE
    }

    /// Distinct handles checked before each [`invoke`](Self::invoke).
    pub fn referenced(&self) -> &[MemoryHandle] {
        &self.referenced
    }

    /// Render the compiled tape against the bound arguments.
    pub fn listing(&self) -> Option<Listing<'_>> {
        self.arguments
            .as_ref()
            .map(|args| Listing::new(self.operations.as_bytes(), args.as_bytes()))
    }

    /// Bind a fresh argument tape built from `operands`, one handle per
    /// argument word in tape order (see [`layout`](Self::layout)).
    ///
    /// Returns the previously bound tape. On error the sequence is left
    /// unchanged.
    pub fn bind(
        &mut self,
        operands: &[MemoryHandle],
    ) -> Result<Option<FrozenBuffer>, DispatchError> {
        if operands.len() != self.layout.len() {
            return Err(DispatchError::OperandCountMismatch {
                expected: self.layout.len(),
                found: operands.len(),
            });
        }
        for (handle, &kind) in operands.iter().zip(&self.layout) {
            let required = kind.elements();
            if handle.len() < required {
                return Err(DispatchError::StorageTooSmall {
                    kind,
                    required,
                    available: handle.len(),
                });
            }
        }

        let mut tape = ArgumentTape::with_capacity(operands.len())?;
        for handle in operands {
            tape.push(handle.word())?;
        }
        let referenced: IndexSet<MemoryHandle> = operands.iter().copied().collect();
        self.referenced = referenced.into_iter().collect();
        tracing::debug!(
            operands = operands.len(),
            distinct = self.referenced.len(),
            "sequence rebound"
        );
        Ok(self.arguments.replace(tape.freeze()))
    }

    /// Bind a raw argument tape.
    ///
    /// Only the length is checked. The handles the tape addresses are
    /// unknown to the sequence, so subsequent [`invoke`](Self::invoke)
    /// calls check nothing until the next [`bind`](Self::bind).
    ///
    /// # Safety
    ///
    /// Every word in `arguments` must be the address of live `f32`
    /// storage large enough for the operand role at that position, and
    /// must remain so for every invocation while this tape is bound.
    #[allow(unsafe_code)]
    pub unsafe fn bind_arguments(
        &mut self,
        arguments: FrozenBuffer,
    ) -> Result<Option<FrozenBuffer>, DispatchError> {
        let expected = self.argument_len();
        if arguments.len() != expected {
            return Err(DispatchError::ArgumentLayoutMismatch {
                expected,
                found: arguments.len(),
            });
        }
        self.referenced.clear();
        tracing::debug!(bytes = expected, "sequence bound to raw arguments");
        Ok(self.arguments.replace(arguments))
    }

    /// Detach the bound argument tape.
    pub fn unbind(&mut self) -> Option<FrozenBuffer> {
        self.referenced.clear();
        self.arguments.take()
    }

    /// Run the compiled operations once against current storage.
    ///
    /// Every arena-backed handle the bound arguments address is checked
    /// against `arena` first; nothing runs if any was freed or moved.
    /// Taking the arena mutably guarantees no safe borrow of its storage
    /// is alive while the routine writes through raw addresses.
    pub fn invoke(&self, arena: &mut StorageArena) -> Result<(), DispatchError> {
        let arguments = self.arguments.as_ref().ok_or(DispatchError::Unbound)?;
        for handle in &self.referenced {
            if let Err(e) = arena.check(handle) {
                tracing::warn!(handle = %handle, error = %e, "invocation blocked");
                return Err(e.into());
            }
        }
        tracing::trace!(operations = self.operations.len(), "invoking sequence");
        // SAFETY: the routine consumes exactly `layout` (the
        // `CodeGenerator` contract) and the bound tape matches it; tracked
        // storage was checked above and is exclusively borrowed for the
        // call; untracked handles were promised valid by whoever created
        // them.
        #[allow(unsafe_code)]
        unsafe {
            self.routine.call(arguments.as_ptr());
        }
        Ok(())
    }

    /// Run the compiled operations without checking any handle.
    ///
    /// # Safety
    ///
    /// Every address in the bound argument tape must refer to live,
    /// unmoved storage with no other reference in use for the call.
    #[allow(unsafe_code)]
    pub unsafe fn invoke_unchecked(&self) -> Result<(), DispatchError> {
        let arguments = self.arguments.as_ref().ok_or(DispatchError::Unbound)?;
        // SAFETY: forwarded to the caller.
        unsafe { self.routine.call(arguments.as_ptr()) };
        Ok(())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("operations", &self.operations.len())
            .field("argument_len", &self.argument_len())
            .field("bound", &self.is_bound())
            .field("referenced", &self.referenced.len())
            .finish_non_exhaustive()
    }
}
