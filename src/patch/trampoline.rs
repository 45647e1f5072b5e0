// Wed Jan 15 2026 - Alex

//! Hooks that keep the replaced function callable.
//!
//! The words a hook overwrites are copied into a freshly allocated block,
//! relocated where needed, and followed by a jump back to the rest of the
//! original function. The block's address is published through an
//! [`OriginalFunction`] slot.

use crate::assembler::AssembleError;
use crate::memory::access::{allocate_or_abort, write_code};
use crate::memory::{Address, PhysicalMemory, WORD_SIZE};
use crate::patch::jump::{branch_target, is_branch, is_relative_branch, jump_absolute};
use crate::patch::{encode_words, Hook, PatchError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Primary opcode 16: conditional branch.
const BC_OPCODE: u32 = 0x4000_0000;
const PRIMARY_OPCODE_MASK: u32 = 0xFC00_0000;
const AA_BIT: u32 = 0x2;

/// Where the relocated copy of a hooked function lives. Zero means unbound.
///
/// `const`-constructible so it can be a `static` next to the replacement.
#[derive(Debug, Default)]
pub struct OriginalFunction {
    address: AtomicU32,
}

impl OriginalFunction {
    pub const fn new() -> Self {
        Self {
            address: AtomicU32::new(0),
        }
    }

    pub fn bind(&self, address: Address) {
        self.address.store(address.as_u32(), Ordering::Release);
    }

    pub fn get(&self) -> Option<Address> {
        match self.address.load(Ordering::Acquire) {
            0 => None,
            value => Some(Address::new(value)),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.get().is_some()
    }
}

/// Rewrites one moved word so it still reaches its original destination.
pub fn relocate_word(word: u32, at: Address) -> Result<Vec<u32>, AssembleError> {
    if is_relative_branch(word) {
        if let Some(destination) = branch_target(word, at) {
            return jump_absolute(destination);
        }
    }

    let relative_call = is_branch(word) && word & AA_BIT == 0;
    let relative_conditional = word & PRIMARY_OPCODE_MASK == BC_OPCODE && word & AA_BIT == 0;
    if relative_call || relative_conditional {
        log::warn!("relative branch {:#010x} at {} copied without relocation", word, at);
    }

    Ok(vec![word])
}

pub struct TrampolinePatch {
    hook: Hook,
    block: Address,
    block_words: Vec<u32>,
    slot: &'static OriginalFunction,
}

impl TrampolinePatch {
    /// Builds the relocated block and binds `slot` to it immediately; the
    /// hook itself is only written by `enable`.
    pub fn create(
        memory: Arc<dyn PhysicalMemory>,
        address: Address,
        slot: &'static OriginalFunction,
        replacement: Address,
    ) -> Result<Self, PatchError> {
        let hook = Hook::create(memory.clone(), address, replacement)?;

        let mut block_words = Vec::with_capacity(hook.len() * 2);
        for (line, word) in hook.lines().iter().zip(hook.original_words()?) {
            block_words.extend(relocate_word(word, line.address())?);
        }
        block_words.extend(jump_absolute(hook.resume_address())?);

        let len = block_words.len() * WORD_SIZE;
        let block = allocate_or_abort(memory.as_ref(), len, "trampoline");
        write_code(memory.as_ref(), block, &encode_words(&block_words))?;
        slot.bind(block);

        log::info!(
            "trampoline {} -> {}, original relocated to {} ({} words)",
            address,
            replacement,
            block,
            block_words.len()
        );

        Ok(Self {
            hook,
            block,
            block_words,
            slot,
        })
    }

    pub fn enable(&mut self) -> Result<(), PatchError> {
        self.hook.enable()
    }

    pub fn disable(&mut self) -> Result<(), PatchError> {
        self.hook.disable()
    }

    pub fn hook(&self) -> &Hook {
        &self.hook
    }

    /// Address the original function is now callable at.
    pub fn block(&self) -> Address {
        self.block
    }

    pub fn block_words(&self) -> &[u32] {
        &self.block_words
    }

    pub fn slot(&self) -> &'static OriginalFunction {
        self.slot
    }
}

impl std::fmt::Debug for TrampolinePatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrampolinePatch")
            .field("hook", &self.hook)
            .field("block", &self.block)
            .field("block_words", &self.block_words.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEvent;
    use crate::patch::testing::{setup, CODE, HEAP, HEAP_PHYSICAL, HIGH_CODE};

    #[test]
    fn test_original_function_slot() {
        static SLOT: OriginalFunction = OriginalFunction::new();
        assert_eq!(SLOT.get(), None);

        SLOT.bind(Address::new(0x8000_0000));
        assert!(SLOT.is_bound());
        assert_eq!(SLOT.get(), Some(Address::new(0x8000_0000)));
    }

    #[test]
    fn test_relocate_word() {
        assert_eq!(relocate_word(0x7C08_02A6, CODE).unwrap(), vec![0x7C08_02A6]);
        // b -16 from high memory needs the long form
        assert_eq!(
            relocate_word(0x4BFF_FFF0, Address::new(0x0300_0010)).unwrap(),
            vec![0x3D60_0300, 0x616B_0000, 0x7D69_03A6, 0x4E80_0420]
        );
        assert_eq!(relocate_word(0x4800_0008, CODE).unwrap(), vec![0x4880_000A]);
        assert_eq!(relocate_word(0x4800_0101, CODE).unwrap(), vec![0x4800_0101]);
        assert_eq!(relocate_word(0x4800_0102, CODE).unwrap(), vec![0x4800_0102]);
    }

    #[test]
    fn test_trampoline_relocates_overwritten_words() {
        static SLOT: OriginalFunction = OriginalFunction::new();
        let (sim, memory) = setup();
        let original = [0x9421_FFF0, 0x7C08_02A6, 0x4800_0100, 0x3860_0000];
        for (i, word) in original.iter().enumerate() {
            sim.poke_word(CODE.word(i), *word).unwrap();
        }

        let mut trampoline = TrampolinePatch::create(memory, CODE, &SLOT, HIGH_CODE).unwrap();
        assert_eq!(trampoline.hook().len(), 4);
        assert_eq!(SLOT.get(), Some(HEAP));
        assert_eq!(trampoline.block(), HEAP);

        // the b at CODE+8 becomes ba CODE+0x108, then ba back to CODE+16
        let expected = [0x9421_FFF0, 0x7C08_02A6, 0x4880_010A, 0x3860_0000, 0x4880_0012];
        assert_eq!(trampoline.block_words(), &expected);
        for (i, word) in expected.iter().enumerate() {
            assert_eq!(sim.peek_word(HEAP.word(i)).unwrap(), *word);
        }

        // nothing is hooked until enable
        assert_eq!(sim.peek_word(CODE).unwrap(), original[0]);
        trampoline.enable().unwrap();
        assert_eq!(sim.peek_word(CODE).unwrap(), 0x3D60_0300);
        trampoline.disable().unwrap();
        for (i, word) in original.iter().enumerate() {
            assert_eq!(sim.peek_word(CODE.word(i)).unwrap(), *word);
        }
    }

    #[test]
    fn test_trampoline_block_install_order() {
        static SLOT: OriginalFunction = OriginalFunction::new();
        let (sim, memory) = setup();

        let trampoline = TrampolinePatch::create(memory, CODE, &SLOT, CODE + 0x400).unwrap();
        assert_eq!(trampoline.block_words().len(), 2);

        let events = sim.events();
        let tail = &events[events.len() - 3..];
        assert_eq!(
            tail,
            &[
                MemoryEvent::Allocate { addr: HEAP, len: 8 },
                MemoryEvent::Write { physical: HEAP_PHYSICAL, len: 8 },
                MemoryEvent::InvalidateInstructionCache { addr: HEAP, len: 8 },
            ]
        );
    }
}
