// Tue Jan 13 2026 - Alex

use crate::assembler::{AssembleError, InstructionDef, Mnemonic, OperandList};

/// Finds the table entry for `mnemonic`.
///
/// Only the first entry with a matching mnemonic is considered: if its
/// operand shape does not fit, matching fails even when a later entry with
/// the same mnemonic would have accepted the operands.
pub fn find_definition<'t>(
    table: &'t [InstructionDef],
    mnemonic: Mnemonic,
    operands: &OperandList,
) -> Result<&'t InstructionDef, AssembleError> {
    let def = table
        .iter()
        .find(|def| def.mnemonic == mnemonic)
        .ok_or(AssembleError::InvalidInstruction { mnemonic })?;

    if def.is_compatible(operands) {
        Ok(def)
    } else {
        Err(AssembleError::InvalidInstruction { mnemonic })
    }
}
