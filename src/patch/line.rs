// Wed Jan 15 2026 - Alex

use crate::assembler::{self, BRANCH_OFFSET_MASK, SHORT_JUMP_LIMIT};
use crate::memory::{read_word, write_instruction, Address, PhysicalMemory};
use crate::patch::PatchError;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Branch,
    BranchLink,
}

impl BranchKind {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BranchKind::Branch => "b",
            BranchKind::BranchLink => "bl",
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One instruction word to install at one address.
///
/// The word that was there before is read the first time the patch is
/// applied in either direction and kept for every later `disable`. Applying
/// requires `&mut self`, so the capture cannot race within safe code.
pub struct LinePatch {
    memory: Arc<dyn PhysicalMemory>,
    address: Address,
    word: u32,
    original: Option<u32>,
}

impl LinePatch {
    pub fn create(memory: Arc<dyn PhysicalMemory>, address: Address, word: u32) -> Self {
        Self {
            memory,
            address,
            word,
            original: None,
        }
    }

    pub fn line(memory: Arc<dyn PhysicalMemory>, address: Address, instruction: &str) -> Result<Self, PatchError> {
        let word = assembler::assemble(instruction)?;
        Ok(Self::create(memory, address, word))
    }

    /// One patch per instruction, at consecutive words from `address`.
    pub fn multiline<S: AsRef<str>>(
        memory: Arc<dyn PhysicalMemory>,
        address: Address,
        instructions: &[S],
    ) -> Result<Vec<Self>, PatchError> {
        instructions
            .iter()
            .enumerate()
            .map(|(i, instruction)| Self::line(memory.clone(), address.word(i), instruction.as_ref()))
            .collect()
    }

    /// A relative `b`/`bl` from `address` to `target`.
    pub fn short_branch(
        memory: Arc<dyn PhysicalMemory>,
        kind: BranchKind,
        address: Address,
        target: Address,
    ) -> Result<Self, PatchError> {
        let delta = target.distance(address);
        if delta.unsigned_abs() > SHORT_JUMP_LIMIT as u64 {
            return Err(PatchError::BranchOutOfRange { from: address, to: target });
        }

        let displacement = (delta as i32 as u32) & BRANCH_OFFSET_MASK;
        Self::line(memory, address, &format!("{} {:#x}", kind, displacement))
    }

    fn ensure_captured(&mut self) -> Result<u32, PatchError> {
        match self.original {
            Some(word) => Ok(word),
            None => {
                let word = read_word(self.memory.as_ref(), self.address)?;
                log::trace!("captured {:#010x} at {}", word, self.address);
                self.original = Some(word);
                Ok(word)
            }
        }
    }

    fn apply(&mut self, enable: bool) -> Result<(), PatchError> {
        let original = self.ensure_captured()?;
        let word = if enable { self.word } else { original };
        write_instruction(self.memory.as_ref(), self.address, word)?;
        Ok(())
    }

    pub fn enable(&mut self) -> Result<(), PatchError> {
        self.apply(true)
    }

    pub fn disable(&mut self) -> Result<(), PatchError> {
        self.apply(false)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn word(&self) -> u32 {
        self.word
    }

    /// The captured original, if the patch has been applied at least once.
    pub fn original(&self) -> Option<u32> {
        self.original
    }

    /// The captured original, or what currently sits at the address.
    /// A live read does not count as a capture.
    pub fn original_word(&self) -> Result<u32, PatchError> {
        match self.original {
            Some(word) => Ok(word),
            None => Ok(read_word(self.memory.as_ref(), self.address)?),
        }
    }
}

impl fmt::Debug for LinePatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinePatch")
            .field("address", &self.address)
            .field("word", &format_args!("{:#010x}", self.word))
            .field("original", &self.original)
            .finish()
    }
}
