// Tue Jan 13 2026 - Alex

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterClass {
    Gpr,
    Fpr,
}

impl fmt::Display for RegisterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterClass::Gpr => write!(f, "GPR"),
            RegisterClass::Fpr => write!(f, "FPR"),
        }
    }
}

/// General purpose registers `r0`-`r31`, plus `R32` which parses but never
/// fits a 5-bit register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
    R16,
    R17,
    R18,
    R19,
    R20,
    R21,
    R22,
    R23,
    R24,
    R25,
    R26,
    R27,
    R28,
    R29,
    R30,
    R31,
    R32,
}

impl Register {
    pub const ALL: [Register; 33] = [
        Register::R0, Register::R1, Register::R2, Register::R3,
        Register::R4, Register::R5, Register::R6, Register::R7,
        Register::R8, Register::R9, Register::R10, Register::R11,
        Register::R12, Register::R13, Register::R14, Register::R15,
        Register::R16, Register::R17, Register::R18, Register::R19,
        Register::R20, Register::R21, Register::R22, Register::R23,
        Register::R24, Register::R25, Register::R26, Register::R27,
        Register::R28, Register::R29, Register::R30, Register::R31,
        Register::R32,
    ];

    /// Volatile register used by long jumps.
    pub const SCRATCH: Register = Register::R11;

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number as usize).copied()
    }

    pub fn number(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.number())
    }
}
