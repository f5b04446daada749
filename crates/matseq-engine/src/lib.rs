//! Recording, compiling, and invoking deferred 4×4 matrix operations.
//!
//! A [`MatrixRecorder`] is bound to one matrix's storage and records
//! operations instead of performing them. A [`DispatchBridge`] consumes
//! the finished recorder, hands its operation tape to an injected
//! [`CodeGenerator`](matseq_core::CodeGenerator), and returns a
//! [`Sequence`] that can be invoked any number of times against whatever
//! the recorded addresses hold at that moment.
//!
//! ```
//! use matseq_arena::StorageArena;
//! use matseq_engine::{DispatchBridge, MatrixRecorder};
//!
//! let mut arena = StorageArena::new();
//! let m = arena.alloc_from(&matseq_engine::kernels::IDENTITY).unwrap();
//! let v = arena.alloc_from(&[1.0, 2.0, 3.0, 1.0]).unwrap();
//!
//! let mut rec = MatrixRecorder::new(arena.whole(m).unwrap()).unwrap();
//! rec.mul_vector(&arena.whole(v).unwrap()).unwrap();
//! assert_eq!(arena.read(v).unwrap(), &[1.0, 2.0, 3.0, 1.0]);
//!
//! let seq = DispatchBridge::interpreting().terminate(rec).unwrap();
//! arena.write(m).unwrap()[12] = 10.0; // translate x after recording
//! seq.invoke(&mut arena).unwrap();
//! assert_eq!(arena.read(v).unwrap(), &[11.0, 2.0, 3.0, 1.0]);
//! ```
//!
//! This crate is one of two that may contain `unsafe` code (along with
//! `matseq-arena`); it is confined to the generator modules and the
//! sequence's call into its routine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod interp;
pub mod kernels;
pub mod native;
pub mod recorder;
pub mod runtime;
pub mod sequence;

pub use bridge::DispatchBridge;
pub use config::{ConfigError, RecorderConfig};
pub use error::{DispatchError, RecordError};
pub use interp::InterpretingGenerator;
pub use native::{CompileFn, ExternCompiler, NativeRoutine, RoutineFn};
pub use recorder::{MatrixRecorder, Operand};
pub use runtime::Runtime;
pub use sequence::Sequence;
