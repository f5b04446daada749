//! Word-level encode/decode for the argument tape.
//!
//! Words are native-endian: the tape is consumed in-process by code that
//! reads them as plain `u64` loads, never persisted or sent elsewhere.

use matseq_arena::GrowableBuffer;
use matseq_core::WORD_SIZE;

use crate::error::TapeError;

// ── Writers ─────────────────────────────────────────────────────

/// Append a single byte.
pub fn write_u8(buf: &mut GrowableBuffer, v: u8) -> Result<(), TapeError> {
    buf.append(&[v])?;
    Ok(())
}

/// Append a native-endian 8-byte word.
pub fn write_word(buf: &mut GrowableBuffer, v: u64) -> Result<(), TapeError> {
    buf.append(&v.to_ne_bytes())?;
    Ok(())
}

// ── Readers ─────────────────────────────────────────────────────

/// Read the native-endian word starting at byte `offset`.
///
/// Returns `None` if fewer than [`WORD_SIZE`] bytes remain.
pub fn read_word(bytes: &[u8], offset: usize) -> Option<u64> {
    let end = offset.checked_add(WORD_SIZE)?;
    let chunk: [u8; WORD_SIZE] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u64::from_ne_bytes(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_round_trip() {
        let mut buf = GrowableBuffer::with_capacity(4).unwrap();
        write_word(&mut buf, 0x0123_4567_89AB_CDEF).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(read_word(buf.as_bytes(), 0), Some(0x0123_4567_89AB_CDEF));
    }

    #[test]
    fn words_are_native_endian() {
        let mut buf = GrowableBuffer::with_capacity(8).unwrap();
        write_word(&mut buf, 1).unwrap();
        assert_eq!(buf.as_bytes(), &1u64.to_ne_bytes());
    }

    #[test]
    fn short_read_returns_none() {
        assert_eq!(read_word(&[0; 7], 0), None);
        assert_eq!(read_word(&[0; 16], 9), None);
        assert_eq!(read_word(&[0; 16], usize::MAX), None);
    }
}
