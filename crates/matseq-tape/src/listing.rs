//! Human-readable rendering of a tape pair.
//!
//! One instruction per line: opcode offset, mnemonic, then each operand
//! as `role=address`. Decoding stops at the first error, which is
//! printed in place of the remaining instructions.
//!
//! ```text
//! 0000  mul.vector  vector=0x00005581e2a4c0c0 self=0x00005581e2a4c080
//! 0001  transpose   self=0x00005581e2a4c080
//! ```

use std::fmt;

use crate::reader::InstructionIter;

/// Display adapter over a borrowed tape pair.
#[derive(Clone, Copy, Debug)]
pub struct Listing<'a> {
    operations: &'a [u8],
    arguments: &'a [u8],
}

impl<'a> Listing<'a> {
    /// Render `operations` replayed against `arguments`.
    pub fn new(operations: &'a [u8], arguments: &'a [u8]) -> Self {
        Self {
            operations,
            arguments,
        }
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in InstructionIter::new(self.operations, self.arguments) {
            match item {
                Ok(ins) => {
                    write!(f, "{:04}  {:<10}", ins.position, ins.opcode.mnemonic())?;
                    for (kind, word) in ins.opcode.operands().iter().zip(&ins.operands) {
                        write!(f, "  {kind}={word:#018x}")?;
                    }
                    writeln!(f)?;
                }
                Err(e) => writeln!(f, "!! {e}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::TapeWriter;
    use matseq_core::Opcode;

    #[test]
    fn lists_one_line_per_instruction() {
        let mut w = TapeWriter::with_capacity(4, 4).unwrap();
        w.emit(Opcode::MulVector, &[0x20, 0x10]).unwrap();
        w.emit(Opcode::Transpose, &[0x10]).unwrap();
        let text = w.listing().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000  mul.vector"));
        assert!(lines[0].contains("vector=0x0000000000000020"));
        assert!(lines[0].contains("self=0x0000000000000010"));
        assert!(lines[1].starts_with("0001  transpose"));
    }

    #[test]
    fn addresses_are_padded_to_sixteen_digits() {
        let mut w = TapeWriter::with_capacity(1, 2).unwrap();
        w.emit(Opcode::MulMatrix, &[0x1, 0xffff_8000_0000_0010]).unwrap();
        let text = w.listing().to_string();
        assert!(text.contains("self=0x0000000000000001"));
        assert!(text.contains("matrix=0xffff800000000010"));
        for operand in text.split_whitespace().filter(|s| s.contains('=')) {
            let (_, address) = operand.split_once('=').unwrap();
            assert_eq!(address.len(), 18, "{operand}");
        }
    }

    #[test]
    fn errors_are_rendered_inline() {
        let text = Listing::new(&[0x03, 0x77], &[0; 8]).to_string();
        assert!(text.contains("0000  transpose"));
        assert!(text.contains("!! unknown opcode 0x77 at offset 1"));
    }
}
