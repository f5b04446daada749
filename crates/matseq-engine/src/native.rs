//! Adapters for natively compiled routines.
//!
//! An external compiler exposes one C entry point taking the operation
//! tape's address and length and returning the address of a generated
//! function, or 0 on failure. The generated function takes a single
//! argument: the argument tape's base address.

#![allow(unsafe_code)]

use matseq_core::{CodeGenerator, GenerateError, Routine};

/// Signature of a generated routine.
pub type RoutineFn = unsafe extern "C" fn(arguments: *const u8);

/// Signature of an external compiler's entry point.
pub type CompileFn = unsafe extern "C" fn(tape: *const u8, len: usize) -> usize;

/// A [`Routine`] backed by a native function pointer.
#[derive(Clone, Copy, Debug)]
pub struct NativeRoutine {
    entry: RoutineFn,
}

impl NativeRoutine {
    /// Wrap a function pointer.
    pub fn new(entry: RoutineFn) -> Self {
        Self { entry }
    }

    /// Wrap a function address returned by an external compiler.
    ///
    /// Returns `None` for a null address.
    ///
    /// # Safety
    ///
    /// A non-zero `addr` must be the entry point of a function with the
    /// [`RoutineFn`] signature that stays loaded for as long as the
    /// returned value exists.
    pub unsafe fn from_address(addr: usize) -> Option<Self> {
        if addr == 0 {
            return None;
        }
        // SAFETY: non-null, and the caller vouches for the signature.
        let entry = unsafe { std::mem::transmute::<usize, RoutineFn>(addr) };
        Some(Self { entry })
    }

    /// The wrapped entry point.
    pub fn entry(&self) -> RoutineFn {
        self.entry
    }
}

impl Routine for NativeRoutine {
    unsafe fn call(&self, arguments: *const u8) {
        // SAFETY: forwarded from `Routine::call`.
        unsafe { (self.entry)(arguments) }
    }
}

/// A [`CodeGenerator`] that delegates to an external compiler.
#[derive(Debug)]
pub struct ExternCompiler {
    name: String,
    compile: CompileFn,
}

impl ExternCompiler {
    /// Adapt `compile` under the given logging name.
    ///
    /// # Safety
    ///
    /// `compile` must only read `len` bytes at `tape`, and must return
    /// either 0 or the address of a [`RoutineFn`] that implements the
    /// tape with the semantics of [`Routine::call`] and stays loaded for
    /// the life of the process.
    pub unsafe fn new(name: impl Into<String>, compile: CompileFn) -> Self {
        Self {
            name: name.into(),
            compile,
        }
    }
}

// SAFETY: `ExternCompiler::new` makes its caller vouch that the entry
// point returns routines honouring the tape's argument layout.
unsafe impl CodeGenerator for ExternCompiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError> {
        // SAFETY: `tape` is valid for `tape.len()` bytes for the call,
        // and `new` made the caller vouch for the entry point.
        let addr = unsafe { (self.compile)(tape.as_ptr(), tape.len()) };
        // SAFETY: as above.
        match unsafe { NativeRoutine::from_address(addr) } {
            Some(routine) => Ok(Box::new(routine)),
            None => Err(GenerateError::Rejected {
                reason: format!("{} returned no routine", self.name),
            }),
        }
    }
}
