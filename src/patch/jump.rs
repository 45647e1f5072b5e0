// Wed Jan 15 2026 - Alex

//! Branch synthesis and decoding.
//!
//! A hook picks the shortest sequence that reaches its target from a known
//! source. Relocated blocks do not know their own address while they are being
//! assembled, so they use `jump_absolute` instead.

use crate::assembler::{self, AssembleError, Mask, Register, BRANCH_OFFSET_MASK, SHORT_JUMP_LIMIT};
use crate::memory::access::split_address;
use crate::memory::{read_word, Address, PhysicalMemory};
use crate::patch::{LinePatch, PatchError};
use std::fmt;
use std::sync::Arc;

pub const LONG_JUMP_LEN: usize = 4;

/// Entry branches followed before `resolve_branch_chain` gives up.
pub const MAX_CHAIN_DEPTH: usize = 16;

const BRANCH_OPCODE: u32 = 0x4800_0000;
const PRIMARY_OPCODE_MASK: u32 = 0xFC00_0000;
const DISPLACEMENT_SIGN: u32 = 0x0200_0000;

const HALFWORD_MASK: u32 = 0xFFFF;
const IMMEDIATE_FIELD_MASK: u32 = 0xFFFF_0000;
/// `lis r11, 0`
const LIS_SCRATCH: u32 = 0x3D60_0000;
/// `ori r11, r11, 0`
const ORI_SCRATCH: u32 = 0x616B_0000;
/// `mtctr r11`
const MTCTR_SCRATCH: u32 = 0x7D69_03A6;
/// `bctr`
const BCTR: u32 = 0x4E80_0420;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpForm {
    /// `ba target`
    Absolute,
    /// `b target - source`
    Relative,
    /// `lis`/`ori`/`mtctr`/`bctr` through r11.
    Long,
}

impl JumpForm {
    pub fn word_count(&self) -> usize {
        match self {
            JumpForm::Absolute | JumpForm::Relative => 1,
            JumpForm::Long => LONG_JUMP_LEN,
        }
    }
}

impl fmt::Display for JumpForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpForm::Absolute => write!(f, "absolute"),
            JumpForm::Relative => write!(f, "relative"),
            JumpForm::Long => write!(f, "long"),
        }
    }
}

/// Whether `ba dst` can encode `dst`.
pub fn short_jump_possible(dst: Address) -> bool {
    dst.as_u32() <= SHORT_JUMP_LIMIT
}

/// Words `jump_absolute(dst)` emits.
pub fn jump_len(dst: Address) -> usize {
    if short_jump_possible(dst) {
        1
    } else {
        LONG_JUMP_LEN
    }
}

pub fn jump_form(source: Address, target: Address) -> JumpForm {
    let delta = target.distance(source);

    if delta.unsigned_abs() > SHORT_JUMP_LIMIT as u64 {
        JumpForm::Long
    } else if short_jump_possible(target) {
        JumpForm::Absolute
    } else {
        JumpForm::Relative
    }
}

/// Position-independent jump to `dst`.
pub fn jump_absolute(dst: Address) -> Result<Vec<u32>, AssembleError> {
    if short_jump_possible(dst) {
        Ok(vec![assembler::assemble(&format!("ba {:#x}", dst.as_u32()))?])
    } else {
        long_jump(dst)
    }
}

/// Jump placed at `source` that lands on `target`.
pub fn jump(source: Address, target: Address) -> Result<Vec<u32>, AssembleError> {
    match jump_form(source, target) {
        JumpForm::Absolute => Ok(vec![assembler::assemble(&format!("ba {:#x}", target.as_u32()))?]),
        JumpForm::Relative => {
            let displacement = (target.distance(source) as i32 as u32) & BRANCH_OFFSET_MASK;
            Ok(vec![assembler::assemble(&format!("b {:#x}", displacement))?])
        }
        JumpForm::Long => long_jump(target),
    }
}

pub fn long_jump(dst: Address) -> Result<Vec<u32>, AssembleError> {
    let (upper, lower) = split_address(dst);
    let scratch = Register::SCRATCH;

    assembler::global().assemble_all(&[
        format!("lis {}, {:#x}", scratch, upper),
        format!("ori {}, {}, {:#x}", scratch, scratch, lower),
        format!("mtctr {}", scratch),
        "bctr".to_string(),
    ])
}

/// One line patch per jump word, at consecutive addresses from `source`.
pub fn jump_patches(
    memory: &Arc<dyn PhysicalMemory>,
    source: Address,
    target: Address,
) -> Result<Vec<LinePatch>, PatchError> {
    let words = jump(source, target)?;
    Ok(words
        .into_iter()
        .enumerate()
        .map(|(i, word)| LinePatch::create(memory.clone(), source.word(i), word))
        .collect())
}

/// Any I-form branch: `b`, `ba`, `bl` or `bla`.
pub fn is_branch(word: u32) -> bool {
    word & PRIMARY_OPCODE_MASK == BRANCH_OPCODE
}

/// A plain `b`: relative, no link.
pub fn is_relative_branch(word: u32) -> bool {
    word & (PRIMARY_OPCODE_MASK | Mask::AA.bits() | Mask::LK.bits()) == BRANCH_OPCODE
}

/// Sign-extended displacement of an I-form branch.
pub fn branch_displacement(word: u32) -> i32 {
    let mut offset = word & BRANCH_OFFSET_MASK;
    if offset & DISPLACEMENT_SIGN != 0 {
        offset |= PRIMARY_OPCODE_MASK;
    }
    offset as i32
}

/// Where the I-form branch at `at` goes, or `None` for any other word.
pub fn branch_target(word: u32, at: Address) -> Option<Address> {
    if !is_branch(word) {
        return None;
    }

    let displacement = branch_displacement(word);
    if word & Mask::AA.bits() != 0 {
        Some(Address::new(displacement as u32))
    } else {
        Some(at.offset(displacement))
    }
}

/// Target of a `long_jump` sequence.
pub fn decode_long_jump(words: &[u32]) -> Option<Address> {
    match words {
        [lis, ori, MTCTR_SCRATCH, BCTR, ..]
            if lis & IMMEDIATE_FIELD_MASK == LIS_SCRATCH && ori & IMMEDIATE_FIELD_MASK == ORI_SCRATCH =>
        {
            Some(Address::new(((lis & HALFWORD_MASK) << 16) | (ori & HALFWORD_MASK)))
        }
        _ => None,
    }
}

fn entry_redirect(memory: &dyn PhysicalMemory, addr: Address) -> Result<Option<Address>, PatchError> {
    let word = read_word(memory, addr)?;

    if word & Mask::LK.bits() == 0 {
        if let Some(target) = branch_target(word, addr) {
            return Ok(Some(target));
        }
    }

    if word & IMMEDIATE_FIELD_MASK != LIS_SCRATCH {
        return Ok(None);
    }

    let mut words = [word, 0, 0, 0];
    for (i, slot) in words.iter_mut().enumerate().skip(1) {
        *slot = read_word(memory, addr.word(i))?;
    }
    Ok(decode_long_jump(&words))
}

/// Follows unconditional jumps sitting at a function's entry, such as an
/// earlier hook, to the code that actually runs.
pub fn resolve_branch_chain(memory: &dyn PhysicalMemory, addr: Address) -> Result<Address, PatchError> {
    let mut current = addr;

    for _ in 0..MAX_CHAIN_DEPTH {
        match entry_redirect(memory, current)? {
            Some(next) if next != current => {
                log::debug!("entry {} redirects to {}", current, next);
                current = next;
            }
            _ => return Ok(current),
        }
    }

    Err(PatchError::BranchChainTooDeep { address: addr })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::testing::{setup, CODE, HIGH_CODE};

    fn landing(words: &[u32], source: Address) -> Option<Address> {
        match words {
            [word] => branch_target(*word, source),
            _ => decode_long_jump(words),
        }
    }

    #[test]
    fn test_short_jump_limits() {
        assert!(short_jump_possible(Address::new(0x01FF_FFFC)));
        assert!(!short_jump_possible(Address::new(0x0200_0000)));
        assert_eq!(jump_len(Address::new(0x100)), 1);
        assert_eq!(jump_len(Address::new(0x8000_0000)), LONG_JUMP_LEN);
    }

    #[test]
    fn test_jump_absolute() {
        assert_eq!(jump_absolute(Address::new(0x0080_0010)).unwrap(), vec![0x4880_0012]);
        assert_eq!(
            jump_absolute(Address::new(0x8000_1234)).unwrap(),
            vec![0x3D60_8000, 0x616B_1234, 0x7D69_03A6, 0x4E80_0420]
        );
    }

    #[test]
    fn test_jump_to_low_target_uses_ba() {
        let source = Address::new(0x0080_0000);
        let target = Address::new(0x0080_0100);

        assert_eq!(jump_form(source, target), JumpForm::Absolute);
        assert_eq!(jump(source, target).unwrap(), vec![0x4880_0102]);
    }

    #[test]
    fn test_jump_boundary() {
        let source = Address::new(0x0100_0000);
        let near = source + SHORT_JUMP_LIMIT;
        let far = near + 4;

        let short = jump(source, near).unwrap();
        assert_eq!(jump_form(source, near), JumpForm::Relative);
        assert_eq!(short, vec![0x49FF_FFFC]);
        assert_eq!(landing(&short, source), Some(near));

        let long = jump(source, far).unwrap();
        assert_eq!(jump_form(source, far), JumpForm::Long);
        assert_eq!(long.len(), JumpForm::Long.word_count());
        assert_eq!(landing(&long, source), Some(far));
    }

    #[test]
    fn test_backward_relative_jump() {
        let source = Address::new(0x0300_0000);
        let target = Address::new(0x0280_0000);

        let words = jump(source, target).unwrap();
        assert_eq!(words, vec![0x4B80_0000]);
        assert_eq!(branch_displacement(words[0]), -0x80_0000);
        assert_eq!(landing(&words, source), Some(target));
    }

    #[test]
    fn test_branch_decoding() {
        assert!(is_relative_branch(0x4800_0100));
        assert!(!is_relative_branch(0x4800_0101));
        assert!(!is_relative_branch(0x4800_0102));
        assert!(is_branch(0x4800_0101));
        assert!(!is_branch(0x6000_0000));
        assert_eq!(branch_displacement(0x4BFF_FFFC), -4);
        assert_eq!(branch_target(0x4800_0102, Address::new(0x5000)), Some(Address::new(0x100)));
        assert_eq!(branch_target(0x6000_0000, Address::new(0x5000)), None);
    }

    #[test]
    fn test_jump_patches() {
        let (_, memory) = setup();
        let patches = jump_patches(&memory, CODE, HIGH_CODE).unwrap();

        assert_eq!(patches.len(), LONG_JUMP_LEN);
        for (i, patch) in patches.iter().enumerate() {
            assert_eq!(patch.address(), CODE.word(i));
        }
        assert_eq!(patches[3].word(), BCTR);
    }

    #[test]
    fn test_resolve_branch_chain() {
        let (sim, memory) = setup();
        sim.poke_word(CODE, 0x4800_0100).unwrap();
        sim.poke_word(CODE + 0x100, 0x4800_0002 | (CODE + 0x200).as_u32()).unwrap();
        sim.poke_word(CODE + 0x200, 0x6000_0000).unwrap();

        assert_eq!(resolve_branch_chain(memory.as_ref(), CODE).unwrap(), CODE + 0x200);
        assert_eq!(resolve_branch_chain(memory.as_ref(), CODE + 0x200).unwrap(), CODE + 0x200);
    }

    #[test]
    fn test_resolve_through_long_jump() {
        let (sim, memory) = setup();
        for (i, word) in long_jump(HIGH_CODE).unwrap().into_iter().enumerate() {
            sim.poke_word(CODE.word(i), word).unwrap();
        }

        assert_eq!(resolve_branch_chain(memory.as_ref(), CODE).unwrap(), HIGH_CODE);
    }

    #[test]
    fn test_resolve_stops_at_calls_and_self_loops() {
        let (sim, memory) = setup();
        sim.poke_word(CODE, 0x4800_0041).unwrap();
        sim.poke_word(CODE + 0x10, 0x4800_0000).unwrap();

        assert_eq!(resolve_branch_chain(memory.as_ref(), CODE).unwrap(), CODE);
        assert_eq!(resolve_branch_chain(memory.as_ref(), CODE + 0x10).unwrap(), CODE + 0x10);
    }

    #[test]
    fn test_resolve_cycle_is_bounded() {
        let (sim, memory) = setup();
        sim.poke_word(CODE, 0x4800_0004).unwrap();
        sim.poke_word(CODE + 4, 0x4BFF_FFFC).unwrap();

        assert_eq!(
            resolve_branch_chain(memory.as_ref(), CODE),
            Err(PatchError::BranchChainTooDeep { address: CODE })
        );
    }
}
