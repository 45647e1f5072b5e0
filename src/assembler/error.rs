// Tue Jan 13 2026 - Alex

use crate::assembler::{Mnemonic, Operand, OperandDef, RegisterClass};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error("instruction is empty")]
    EmptyInstruction,
    #[error("instruction too large: {count} operands, at most 3 are supported")]
    InstructionTooLarge { count: usize },
    #[error("invalid mnemonic \"{mnemonic}\"")]
    InvalidMnemonic { mnemonic: String },
    #[error("invalid operand \"{operand}\"")]
    InvalidOperand { operand: String },
    #[error("operand mismatch: {operand} cannot be encoded as {expected}")]
    OperandMismatch { operand: Operand, expected: OperandDef },
    #[error("integer \"{value:#x}\" too large, field holds {max_bits} bits")]
    IntegerTooLarge { value: u32, max_bits: usize },
    #[error("register type mismatch: got {found}, expected {expected}")]
    RegisterTypeMismatch { found: RegisterClass, expected: RegisterClass },
    #[error("integer conversion for \"{integer}\" failed")]
    IntegerConversionFailure { integer: String },
    #[error("invalid instruction: operands do not fit any form of \"{mnemonic}\"")]
    InvalidInstruction { mnemonic: Mnemonic },
}

impl AssembleError {
    pub(crate) fn conversion(integer: &str) -> Self {
        AssembleError::IntegerConversionFailure { integer: integer.to_string() }
    }

    pub(crate) fn invalid_operand(operand: &str) -> Self {
        AssembleError::InvalidOperand { operand: operand.to_string() }
    }
}
