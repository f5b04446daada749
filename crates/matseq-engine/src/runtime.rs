//! Process-wide runtime initialization.
//!
//! [`init`] runs once per process no matter how many times it is
//! called; every [`DispatchBridge`](crate::DispatchBridge) calls it on
//! construction, so explicit calls are only needed to control when the
//! one-time work happens.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use matseq_core::WORD_SIZE;

// Addresses must fit in one argument word.
const _: () = assert!(std::mem::size_of::<usize>() <= WORD_SIZE);

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Facts about the host recorded at initialization, plus process-wide
/// counters.
#[derive(Debug)]
pub struct Runtime {
    pointer_width: u32,
    little_endian: bool,
    compiled: AtomicU64,
}

impl Runtime {
    fn detect() -> Self {
        Self {
            pointer_width: usize::BITS,
            little_endian: cfg!(target_endian = "little"),
            compiled: AtomicU64::new(0),
        }
    }

    /// Host pointer width in bits.
    pub fn pointer_width(&self) -> u32 {
        self.pointer_width
    }

    /// Whether argument words are stored little-endian on this host.
    pub fn is_little_endian(&self) -> bool {
        self.little_endian
    }

    /// Number of sequences compiled by any bridge in this process.
    pub fn compiled_sequences(&self) -> u64 {
        self.compiled.load(Ordering::Relaxed)
    }

    pub(crate) fn record_compile(&self) {
        self.compiled.fetch_add(1, Ordering::Relaxed);
    }
}

/// Initialize the runtime if needed and return it.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        let runtime = Runtime::detect();
        tracing::info!(
            pointer_width = runtime.pointer_width,
            little_endian = runtime.little_endian,
            "matseq runtime initialised"
        );
        runtime
    })
}

/// The runtime, if [`init`] has already run.
pub fn get() -> Option<&'static Runtime> {
    RUNTIME.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let a = init();
        let b = init();
        assert!(std::ptr::eq(a, b));
        assert!(get().is_some_and(|r| std::ptr::eq(r, a)));
    }

    #[test]
    fn detects_host_layout() {
        let rt = init();
        assert_eq!(rt.pointer_width(), usize::BITS);
        assert_eq!(rt.is_little_endian(), 1u16.to_ne_bytes()[0] == 1);
    }
}
