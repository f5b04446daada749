//! Opcode byte values and the per-opcode operand table.
//!
//! The operation tape carries one byte per instruction and the argument
//! tape carries a fixed number of 8-byte words per instruction. Nothing in
//! either tape records where one instruction's arguments end, so the
//! encoder and every decoder must agree on [`Opcode::operands`]. This table
//! is the single source of that agreement.

use std::fmt;

/// Width in bytes of one argument word on the argument tape.
pub const WORD_SIZE: usize = 8;

/// Number of `f32` elements in a 4×4 matrix.
pub const MATRIX_ELEMENTS: u32 = 16;

/// Number of `f32` elements in a 4-component vector.
pub const VECTOR_ELEMENTS: u32 = 4;

/// What an argument word addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// The recorder's own matrix; read and written by the instruction.
    Target,
    /// Another matrix, read only.
    Matrix,
    /// A 4-component vector, read and written by the instruction.
    Vector,
}

impl OperandKind {
    /// Minimum number of `f32` elements the addressed storage must hold.
    pub fn elements(self) -> u32 {
        match self {
            Self::Target | Self::Matrix => MATRIX_ELEMENTS,
            Self::Vector => VECTOR_ELEMENTS,
        }
    }

    /// Short role label used in listings and errors.
    pub fn label(self) -> &'static str {
        match self {
            Self::Target => "self",
            Self::Matrix => "matrix",
            Self::Vector => "vector",
        }
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One instruction kind on the operation tape.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `self = self × other`. Arguments: self, other.
    MulMatrix = 0x01,
    /// `vector = self × vector`. Arguments: vector, self.
    MulVector = 0x02,
    /// Transpose self in place. Arguments: self.
    Transpose = 0x03,
    /// Invert self in place. Arguments: self.
    Invert = 0x04,
}

impl Opcode {
    /// Every opcode, in discriminant order.
    pub const ALL: [Opcode; 4] = [
        Opcode::MulMatrix,
        Opcode::MulVector,
        Opcode::Transpose,
        Opcode::Invert,
    ];

    /// Returns the opcode byte value.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Parses an opcode from its byte value.
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::MulMatrix),
            0x02 => Some(Self::MulVector),
            0x03 => Some(Self::Transpose),
            0x04 => Some(Self::Invert),
            _ => None,
        }
    }

    /// Operand kinds in argument-tape order.
    ///
    /// Note the two multiplies disagree on where the target goes: the
    /// matrix product stores self first, the vector product stores the
    /// vector first. Generated code depends on this order.
    pub const fn operands(self) -> &'static [OperandKind] {
        match self {
            Self::MulMatrix => &[OperandKind::Target, OperandKind::Matrix],
            Self::MulVector => &[OperandKind::Vector, OperandKind::Target],
            Self::Transpose | Self::Invert => &[OperandKind::Target],
        }
    }

    /// Number of argument words this opcode consumes.
    pub const fn arity(self) -> usize {
        self.operands().len()
    }

    /// Number of argument-tape bytes this opcode consumes.
    pub const fn argument_bytes(self) -> usize {
        self.arity() * WORD_SIZE
    }

    /// Mnemonic used by tape listings.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::MulMatrix => "mul.matrix",
            Self::MulVector => "mul.vector",
            Self::Transpose => "transpose",
            Self::Invert => "invert",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(b: u8) -> Result<Self, u8> {
        Self::from_byte(b).ok_or(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_values_are_stable() {
        assert_eq!(Opcode::MulMatrix as u8, 0x01);
        assert_eq!(Opcode::MulVector as u8, 0x02);
        assert_eq!(Opcode::Transpose as u8, 0x03);
        assert_eq!(Opcode::Invert as u8, 0x04);
    }

    #[test]
    fn byte_round_trips_for_every_opcode() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_byte(op.byte()), Some(op));
        }
        assert_eq!(Opcode::from_byte(0x00), None);
        assert_eq!(Opcode::from_byte(0x05), None);
        assert_eq!(Opcode::try_from(0xFF), Err(0xFF));
    }

    #[test]
    fn multiply_operand_orders_differ() {
        assert_eq!(
            Opcode::MulMatrix.operands(),
            &[OperandKind::Target, OperandKind::Matrix]
        );
        assert_eq!(
            Opcode::MulVector.operands(),
            &[OperandKind::Vector, OperandKind::Target]
        );
    }

    #[test]
    fn arity_table() {
        assert_eq!(Opcode::MulMatrix.arity(), 2);
        assert_eq!(Opcode::MulVector.arity(), 2);
        assert_eq!(Opcode::Transpose.arity(), 1);
        assert_eq!(Opcode::Invert.arity(), 1);
        assert_eq!(Opcode::MulVector.argument_bytes(), 16);
    }

    #[test]
    fn operand_element_counts() {
        assert_eq!(OperandKind::Target.elements(), 16);
        assert_eq!(OperandKind::Matrix.elements(), 16);
        assert_eq!(OperandKind::Vector.elements(), 4);
    }
}
