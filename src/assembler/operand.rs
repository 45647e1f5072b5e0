// Tue Jan 13 2026 - Alex

use crate::assembler::{Register, RegisterClass};
use std::fmt;

/// Maximum number of operands an instruction can carry.
pub const OPERAND_NUM: usize = 3;

/// A parsed instruction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Immediate { value: u32 },
    Direct { class: RegisterClass, register: Register },
    Indirect { offset: u32, register: Register },
}

impl Operand {
    pub fn immediate(value: u32) -> Self {
        Operand::Immediate { value }
    }

    pub fn gpr(register: Register) -> Self {
        Operand::Direct { class: RegisterClass::Gpr, register }
    }

    pub fn indirect(offset: u32, register: Register) -> Self {
        Operand::Indirect { offset, register }
    }

    /// Kind-only comparison; values are checked later by codegen.
    pub fn matches_kind(&self, def: &OperandDef) -> bool {
        matches!(
            (self, &def.kind),
            (Operand::Immediate { .. }, OperandDefKind::Immediate)
                | (Operand::Direct { .. }, OperandDefKind::Direct { .. })
                | (Operand::Indirect { .. }, OperandDefKind::Indirect { .. })
        )
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Immediate { value } => write!(f, "{:#x}", value),
            Operand::Direct { register, .. } => write!(f, "{}", register),
            Operand::Indirect { offset, register } => write!(f, "{:#x}({})", offset, register),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandDefKind {
    Direct { class: RegisterClass },
    /// The base register takes the high `bits - offset_bits` bits of the
    /// field starting at `pos`; the offset has its own position.
    Indirect { offset_pos: u8, offset_bits: u8 },
    Immediate,
}

/// Where an operand is packed: `bits` wide, starting `pos` bits from the most
/// significant end of the word.
///
/// Only built through the const constructors, which reject fields that spill
/// past bit 31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandDef {
    pos: u8,
    bits: u8,
    kind: OperandDefKind,
}

impl OperandDef {
    pub const fn direct(pos: u8, bits: u8, class: RegisterClass) -> Self {
        Self::checked(pos, bits, OperandDefKind::Direct { class })
    }

    pub const fn immediate(pos: u8, bits: u8) -> Self {
        Self::checked(pos, bits, OperandDefKind::Immediate)
    }

    pub const fn indirect(pos: u8, bits: u8, offset_pos: u8, offset_bits: u8) -> Self {
        assert!(offset_bits <= bits, "offset wider than the whole field");
        assert!(offset_pos as u32 + offset_bits as u32 <= 32, "offset field exceeds the word");
        Self::checked(pos, bits, OperandDefKind::Indirect { offset_pos, offset_bits })
    }

    const fn checked(pos: u8, bits: u8, kind: OperandDefKind) -> Self {
        assert!(pos as u32 + bits as u32 <= 32, "operand field exceeds the word");
        Self { pos, bits, kind }
    }

    pub const fn pos(&self) -> u8 {
        self.pos
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub const fn kind(&self) -> OperandDefKind {
        self.kind
    }
}

impl fmt::Display for OperandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OperandDefKind::Direct { class } => write!(f, "{} register", class)?,
            OperandDefKind::Indirect { .. } => write!(f, "offset(register)")?,
            OperandDefKind::Immediate => write!(f, "immediate")?,
        }
        write!(f, " at bits {}..{}", self.pos, self.pos + self.bits)
    }
}

pub type OperandList = [Option<Operand>; OPERAND_NUM];
pub type OperandDefList = [Option<OperandDef>; OPERAND_NUM];

pub const EMPTY_OPERAND_LIST: OperandList = [None; OPERAND_NUM];
