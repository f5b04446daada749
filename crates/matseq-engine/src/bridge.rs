//! Turning finished recorders into sequences.

use matseq_core::CodeGenerator;
use matseq_tape::decode;

use crate::error::DispatchError;
use crate::interp::InterpretingGenerator;
use crate::recorder::MatrixRecorder;
use crate::runtime::{self, Runtime};
use crate::sequence::Sequence;

/// Finalizes recorders and compiles them with an injected generator.
#[derive(Debug)]
pub struct DispatchBridge<G> {
    generator: G,
    runtime: &'static Runtime,
}

impl<G: CodeGenerator> DispatchBridge<G> {
    /// Create a bridge, initializing the runtime if this is the first.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            runtime: runtime::init(),
        }
    }

    /// The code generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The process-wide runtime.
    pub fn runtime(&self) -> &'static Runtime {
        self.runtime
    }

    /// Freeze `recorder`'s tapes, compile them, and return a sequence
    /// bound to the recorder's argument tape.
    ///
    /// The recorder is consumed whether or not compilation succeeds.
    /// An empty recorder is an error; so is any generator failure, and
    /// in that case no sequence exists.
    pub fn terminate(&self, recorder: MatrixRecorder) -> Result<Sequence, DispatchError> {
        if recorder.is_empty() {
            return Err(DispatchError::EmptyTape);
        }
        let (tape, referenced) = recorder.into_parts();
        let (operations, arguments) = tape.finish();

        let instructions = decode(operations.as_bytes(), arguments.as_bytes())?;
        let layout = instructions
            .iter()
            .flat_map(|ins| ins.opcode.operands().iter().copied())
            .collect();

        let routine = self
            .generator
            .compile(operations.as_bytes())
            .inspect_err(|e| {
                tracing::warn!(
                    generator = self.generator.name(),
                    error = %e,
                    "code generation failed"
                );
            })?;
        self.runtime.record_compile();
        tracing::debug!(
            generator = self.generator.name(),
            operations = operations.len(),
            argument_bytes = arguments.len(),
            "sequence compiled"
        );
        Ok(Sequence::new(routine, operations, layout, arguments, referenced))
    }
}

impl DispatchBridge<InterpretingGenerator> {
    /// A bridge using the built-in interpreter.
    pub fn interpreting() -> Self {
        Self::new(InterpretingGenerator)
    }
}

impl<G: CodeGenerator + Default> Default for DispatchBridge<G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}
