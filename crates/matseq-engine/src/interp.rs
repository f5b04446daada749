//! A code generator that replays the tape instead of compiling it.
//!
//! Compilation validates every opcode byte once; the resulting routine
//! then walks the argument tape on each call, loading each operand by
//! value, applying the eager kernel, and storing the result back. Loads
//! and stores are unaligned copies, so operands may alias each other
//! (`m × m` is fine).

#![allow(unsafe_code)]

use std::ptr;

use matseq_core::{CodeGenerator, GenerateError, Opcode, Routine, WORD_SIZE};

use crate::kernels::{self, Mat4, Vec4};

/// Generator producing interpreting routines.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterpretingGenerator;

// SAFETY: the routine walks the argument tape with the arity of each
// opcode in `tape`, which it copies at compile time.
unsafe impl CodeGenerator for InterpretingGenerator {
    fn name(&self) -> &str {
        "interpreter"
    }

    fn compile(&self, tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError> {
        let program = tape
            .iter()
            .enumerate()
            .map(|(position, &tag)| {
                Opcode::from_byte(tag).ok_or(GenerateError::UnsupportedOpcode { tag, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(Interpreted { program }))
    }
}

struct Interpreted {
    program: Vec<Opcode>,
}

impl Routine for Interpreted {
    unsafe fn call(&self, arguments: *const u8) {
        let mut cursor = Cursor { next: arguments };
        for &op in &self.program {
            // SAFETY: the argument tape holds `op.arity()` words for this
            // instruction and each addresses storage sized for its role
            // (the `Routine::call` contract).
            unsafe {
                match op {
                    Opcode::MulMatrix => {
                        let target = cursor.word();
                        let other = cursor.word();
                        let mut m: Mat4 = load(target);
                        kernels::mul_matrix(&mut m, &load(other));
                        store(target, &m);
                    }
                    Opcode::MulVector => {
                        let vector = cursor.word();
                        let target = cursor.word();
                        let mut v: Vec4 = load(vector);
                        kernels::mul_vector(&load(target), &mut v);
                        store(vector, &v);
                    }
                    Opcode::Transpose => {
                        let target = cursor.word();
                        let mut m: Mat4 = load(target);
                        kernels::transpose(&mut m);
                        store(target, &m);
                    }
                    Opcode::Invert => {
                        let target = cursor.word();
                        let mut m: Mat4 = load(target);
                        kernels::invert(&mut m);
                        store(target, &m);
                    }
                }
            }
        }
    }
}

struct Cursor {
    next: *const u8,
}

impl Cursor {
    /// Read the next argument word as an element address.
    unsafe fn word(&mut self) -> *mut f32 {
        // SAFETY: caller guarantees a full word remains.
        let word = unsafe { ptr::read_unaligned(self.next.cast::<u64>()) };
        self.next = self.next.wrapping_add(WORD_SIZE);
        word as usize as *mut f32
    }
}

unsafe fn load<const N: usize>(addr: *const f32) -> [f32; N] {
    // SAFETY: caller guarantees `N` readable elements at `addr`.
    unsafe { ptr::read_unaligned(addr.cast::<[f32; N]>()) }
}

unsafe fn store<const N: usize>(addr: *mut f32, value: &[f32; N]) {
    // SAFETY: caller guarantees `N` writable elements at `addr`.
    unsafe { ptr::write_unaligned(addr.cast::<[f32; N]>(), *value) }
}
