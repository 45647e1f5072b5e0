// Tue Jan 13 2026 - Alex

use crate::assembler::{Mask, Mnemonic, OperandDef, OperandDefList, OperandList, RegisterClass};

const GPR: RegisterClass = RegisterClass::Gpr;

/// `rD, rA, IMM`
pub const D_FORM: OperandDefList = [
    Some(OperandDef::direct(6, 5, GPR)),
    Some(OperandDef::direct(11, 5, GPR)),
    Some(OperandDef::immediate(16, 16)),
];

/// `rD, IMM` with rA implied zero.
pub const LI_FORM: OperandDefList = [
    Some(OperandDef::direct(6, 5, GPR)),
    Some(OperandDef::immediate(16, 16)),
    None,
];

/// `rD, OFFSET(rA)`
pub const INDIRECT_D_FORM: OperandDefList = [
    Some(OperandDef::direct(6, 5, GPR)),
    Some(OperandDef::indirect(11, 21, 16, 16)),
    None,
];

/// `TARGET`, the whole LI+AA+LK tail.
pub const B_FORM: OperandDefList = [Some(OperandDef::immediate(6, 26)), None, None];

/// `rS`
pub const S_FORM: OperandDefList = [Some(OperandDef::direct(6, 5, GPR)), None, None];

/// `SPR, rS` where SPR is the encoded (half-swapped) field.
pub const MTSPR_FORM: OperandDefList = [
    Some(OperandDef::immediate(11, 10)),
    Some(OperandDef::direct(6, 5, GPR)),
    None,
];

pub const NO_OPERANDS: OperandDefList = [None, None, None];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionDef {
    pub mnemonic: Mnemonic,
    pub operands: OperandDefList,
    pub mask: Mask,
}

impl InstructionDef {
    pub const fn new(mnemonic: Mnemonic, operands: OperandDefList, mask: Mask) -> Self {
        Self { mnemonic, operands, mask }
    }

    /// Every slot must be present in both or absent in both, and present
    /// slots must agree on operand kind.
    pub fn is_compatible(&self, operands: &OperandList) -> bool {
        self.operands.iter().zip(operands.iter()).all(|pair| match pair {
            (Some(def), Some(operand)) => operand.matches_kind(def),
            (None, None) => true,
            _ => false,
        })
    }

    pub fn operand_count(&self) -> usize {
        self.operands.iter().filter(|def| def.is_some()).count()
    }
}

/// Lookup is first match by mnemonic; order is part of the contract.
pub static INSTRUCTION_TABLE: &[InstructionDef] = &[
    InstructionDef::new(Mnemonic::Addic, D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Addi, D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Addis, D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Li, LI_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Lis, LI_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Ori, D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::B, B_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Ba, B_FORM, Mask::AA),
    InstructionDef::new(Mnemonic::Bl, B_FORM, Mask::LK),
    InstructionDef::new(Mnemonic::Blr, NO_OPERANDS, Mask::LR),
    InstructionDef::new(Mnemonic::Nop, NO_OPERANDS, Mask::empty()),
    InstructionDef::new(Mnemonic::Bctr, NO_OPERANDS, Mask::BI.union(Mask::BCTR)),
    InstructionDef::new(Mnemonic::Mtspr, MTSPR_FORM, Mask::MTSPR),
    InstructionDef::new(Mnemonic::Mtctr, S_FORM, Mask::MTCTR.union(Mask::MTSPR)),
    InstructionDef::new(Mnemonic::Lwz, INDIRECT_D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Lwzu, INDIRECT_D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Lbz, INDIRECT_D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Stw, INDIRECT_D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Stwu, INDIRECT_D_FORM, Mask::empty()),
    InstructionDef::new(Mnemonic::Stb, INDIRECT_D_FORM, Mask::empty()),
];
