// Tue Jan 13 2026 - Alex

use bitflags::bitflags;

pub const OPCODE_BITS: u32 = 6;
pub const OPCODE_MASK: u32 = (1 << OPCODE_BITS) - 1;

/// Largest displacement an I-form branch can encode.
pub const SHORT_JUMP_LIMIT: u32 = 0x01FF_FFFC;

/// The 24-bit LI field of an I-form branch, word aligned.
pub const BRANCH_OFFSET_MASK: u32 = 0x03FF_FFFC;

bitflags! {
    /// Fixed bits OR'd into an instruction word before its operands.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Mask: u32 {
        const LK = 0b0000_0000_0000_0000_0000_0000_0000_0001;
        const AA = 0b0000_0000_0000_0000_0000_0000_0000_0010;
        /// BO=20 (branch always), shared by `blr` and `bctr`.
        const BI = 0b0000_0010_1000_0000_0000_0000_0000_0000;
        const LR = 0b0000_0010_1000_0000_0000_0000_0010_0000;
        const BCTR = 0b0000_0000_0000_0000_0000_0100_0010_0000;
        const MTSPR = 0b0000_0000_0000_0000_0000_0011_1010_0110;
        /// CTR's SPR number in the swapped split field.
        const MTCTR = 0b0000_0000_0000_1001_0000_0000_0000_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_union() {
        let bctr = Mask::BI.union(Mask::BCTR);
        assert_eq!(bctr.bits(), 0x0280_0420);
        assert_eq!(Mask::MTCTR.union(Mask::MTSPR).bits(), 0x0009_03A6);
        assert_eq!(OPCODE_MASK, 0x3F);
    }
}
