// Tue Jan 13 2026 - Alex

use crate::assembler::mask::OPCODE_MASK;
use crate::assembler::{AssembleError, Instruction, InstructionDef, Operand, OperandDef, OperandDefKind};
use crate::utils::count_bits_taken;

/// Packs opcode, fixed mask and every operand into one instruction word.
pub fn generate(instruction: &Instruction, def: &InstructionDef) -> Result<u32, AssembleError> {
    let mut word = ((instruction.mnemonic.opcode() & OPCODE_MASK) << 26) | def.mask.bits();

    for (operand, operand_def) in instruction.operands.iter().zip(def.operands.iter()) {
        if let (Some(operand), Some(operand_def)) = (operand, operand_def) {
            word |= encode_operand(operand, operand_def)?;
        }
    }

    Ok(word)
}

/// Encodes one operand into its field, leaving every other bit clear.
pub fn encode_operand(operand: &Operand, def: &OperandDef) -> Result<u32, AssembleError> {
    match (*operand, def.kind()) {
        (Operand::Immediate { value }, OperandDefKind::Immediate) => pack(value, def.pos(), def.bits()),
        (Operand::Direct { class, register }, OperandDefKind::Direct { class: expected }) => {
            if class != expected {
                return Err(AssembleError::RegisterTypeMismatch { found: class, expected });
            }
            pack(register.number(), def.pos(), def.bits())
        }
        (Operand::Indirect { offset, register }, OperandDefKind::Indirect { offset_pos, offset_bits }) => {
            let base_bits = def.bits() - offset_bits;
            let base = pack(register.number(), def.pos(), base_bits)?;
            let offset = pack(offset, offset_pos, offset_bits)?;
            Ok(base | offset)
        }
        _ => Err(AssembleError::OperandMismatch { operand: *operand, expected: *def }),
    }
}

/// Places `value` in the `bits`-wide field starting `pos` bits from the MSB.
fn pack(value: u32, pos: u8, bits: u8) -> Result<u32, AssembleError> {
    if count_bits_taken(value) > bits as usize {
        return Err(AssembleError::IntegerTooLarge { value, max_bits: bits as usize });
    }
    if bits == 0 {
        return Ok(0);
    }
    Ok(value << (32 - (pos as u32 + bits as u32)))
}
