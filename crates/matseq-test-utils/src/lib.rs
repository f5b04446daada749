//! Test utilities and mock generators for matseq development.
//!
//! Provides seeded matrix fixtures, a tolerance comparison, and wrapper
//! generators ([`CountingGenerator`], [`RejectingGenerator`]) for
//! exercising the dispatch path without a native compiler.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;

use matseq_core::{CodeGenerator, GenerateError, Routine};

pub use fixtures::{assert_close, random_matrix, random_vector, rotation_z, translation};

/// Wraps a generator and counts compile attempts.
pub struct CountingGenerator<G> {
    inner: G,
    compiles: Cell<usize>,
}

impl<G: CodeGenerator> CountingGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            compiles: Cell::new(0),
        }
    }

    /// Number of times `compile` has been called.
    pub fn compiles(&self) -> usize {
        self.compiles.get()
    }
}

// SAFETY: forwards to `G` with the same tape.
#[allow(unsafe_code)]
unsafe impl<G: CodeGenerator> CodeGenerator for CountingGenerator<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn compile(&self, tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError> {
        self.compiles.set(self.compiles.get() + 1);
        self.inner.compile(tape)
    }
}

/// A generator that refuses every tape.
pub struct RejectingGenerator {
    pub reason: String,
}

impl RejectingGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// SAFETY: never returns a routine.
#[allow(unsafe_code)]
unsafe impl CodeGenerator for RejectingGenerator {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn compile(&self, _tape: &[u8]) -> Result<Box<dyn Routine>, GenerateError> {
        Err(GenerateError::Rejected {
            reason: self.reason.clone(),
        })
    }
}
