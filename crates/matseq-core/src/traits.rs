//! The seam between a finished tape and whatever executes it.
//!
//! A [`CodeGenerator`] turns a frozen operation tape into a [`Routine`].
//! The routine is later called with nothing but the base address of an
//! argument tape; it reads operand addresses from there and dereferences
//! live storage directly.

use crate::error::GenerateError;

/// A compiled, repeatedly callable unit produced from one operation tape.
#[allow(unsafe_code)]
pub trait Routine {
    /// Execute the compiled tape once.
    ///
    /// # Safety
    ///
    /// `arguments` must point to an argument tape whose layout matches the
    /// operation tape this routine was compiled from (one native-endian
    /// word per operand, in tape order). Every address in that tape must
    /// refer to live, non-relocated `f32` storage large enough for its
    /// operand kind, and no other reference to that storage may be in use
    /// for the duration of the call.
    unsafe fn call(&self, arguments: *const u8);
}

/// Compiles a frozen operation tape into a [`Routine`].
///
/// Implementations range from an interpreter that replays the tape to an
/// adapter around an external native compiler. The tape is only borrowed
/// for the duration of the call; a generator that needs it later must
/// copy what it needs.
///
/// # Safety
///
/// A routine returned from `compile(tape)` is called from safe code with
/// an argument tape laid out for `tape` and nothing else. It must read
/// exactly the words the arity table assigns to `tape`'s opcodes, in
/// tape order, and touch only the storage those words address (16
/// elements for a matrix role, 4 for a vector role).
///
/// A generator that returns a routine for some other tape cannot be
/// implemented without `unsafe`:
///
/// ```compile_fail,E0200
/// use matseq_core::{CodeGenerator, GenerateError, Routine};
///
/// struct Mismatched<G>(G);
///
/// impl<G: CodeGenerator> CodeGenerator for Mismatched<G> {
///     fn name(&self) -> &str {
///         "mismatched"
///     }
///
///     fn compile(&self, _tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError> {
///         self.0.compile(&[0x02; 64])
///     }
/// }
/// ```
#[allow(unsafe_code)]
pub unsafe trait CodeGenerator {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Compile `tape` (the operation tape bytes, exactly as recorded).
    fn compile(&self, tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError>;
}

// SAFETY: forwards to `G` with the same tape.
#[allow(unsafe_code)]
unsafe impl<G: CodeGenerator + ?Sized> CodeGenerator for &G {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compile(&self, tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError> {
        (**self).compile(tape)
    }
}

// SAFETY: forwards to `G` with the same tape.
#[allow(unsafe_code)]
unsafe impl<G: CodeGenerator + ?Sized> CodeGenerator for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compile(&self, tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError> {
        (**self).compile(tape)
    }
}
