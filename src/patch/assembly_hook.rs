// Wed Jan 15 2026 - Alex

use crate::assembler;
use crate::memory::access::{allocate_or_abort, write_code};
use crate::memory::{Address, PhysicalMemory, WORD_SIZE};
use crate::patch::jump::{jump_absolute, LONG_JUMP_LEN};
use crate::patch::trampoline::relocate_word;
use crate::patch::{encode_words, Hook, PatchError};
use std::sync::Arc;

/// Room reserved past the caller's words: every overwritten word relocated to
/// a long jump, plus the jump back.
const BLOCK_SLACK_WORDS: usize = LONG_JUMP_LEN * LONG_JUMP_LEN + LONG_JUMP_LEN;

/// Runs caller-supplied code in place of the words at `address`, then
/// resumes the original function.
///
/// The block is allocated before the hook exists, since the hook has to jump
/// to it. The hook address is translated first so an unmapped address fails
/// without taking a block the heap can never get back.
pub struct AssemblyHook {
    hook: Hook,
    block: Address,
    block_words: Vec<u32>,
}

impl AssemblyHook {
    pub fn create(
        memory: Arc<dyn PhysicalMemory>,
        address: Address,
        words: Vec<u32>,
        keep_original: bool,
    ) -> Result<Self, PatchError> {
        memory.effective_to_physical(address)?;

        let capacity = (words.len() + BLOCK_SLACK_WORDS) * WORD_SIZE;
        let block = allocate_or_abort(memory.as_ref(), capacity, "assembly hook");
        let hook = Hook::create(memory.clone(), address, block)?;

        let mut block_words = words;
        if keep_original {
            for (line, word) in hook.lines().iter().zip(hook.original_words()?) {
                block_words.extend(relocate_word(word, line.address())?);
            }
        }
        block_words.extend(jump_absolute(hook.resume_address())?);

        write_code(memory.as_ref(), block, &encode_words(&block_words))?;
        log::info!(
            "assembly hook at {} runs {} words from {}",
            address,
            block_words.len(),
            block
        );

        Ok(Self {
            hook,
            block,
            block_words,
        })
    }

    pub fn assemble<S: AsRef<str>>(
        memory: Arc<dyn PhysicalMemory>,
        address: Address,
        instructions: &[S],
        keep_original: bool,
    ) -> Result<Self, PatchError> {
        let words = assembler::global().assemble_all(instructions)?;
        Self::create(memory, address, words, keep_original)
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

    pub fn block(&self) -> Address {
        self.block
    }

    pub fn block_words(&self) -> &[u32] {
        &self.block_words
    }
}

impl std::fmt::Debug for AssemblyHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyHook")
            .field("hook", &self.hook)
            .field("block", &self.block)
            .field("block_words", &self.block_words.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::AssembleError;
    use crate::memory::MemoryError;
    use crate::patch::testing::{setup, CODE, HEAP};

    const PROLOGUE: [u32; 4] = [0x9421_FFF0, 0x7C08_02A6, 0x9001_0014, 0x93E1_000C];

    #[test]
    fn test_keeps_original_words() {
        let (sim, memory) = setup();
        for (i, word) in PROLOGUE.iter().enumerate() {
            sim.poke_word(CODE.word(i), *word).unwrap();
        }

        let mut hook = AssemblyHook::assemble(memory, CODE, &["li r3, 1", "addi r3, r3, 2"], true).unwrap();
        assert_eq!(hook.block(), HEAP);
        assert_eq!(hook.hook().len(), 4);

        let mut expected = vec![0x3860_0001, 0x3863_0002];
        expected.extend(PROLOGUE);
        expected.push(0x4880_0012);
        assert_eq!(hook.block_words(), expected.as_slice());
        for (i, word) in expected.iter().enumerate() {
            assert_eq!(sim.peek_word(HEAP.word(i)).unwrap(), *word);
        }

        hook.enable().unwrap();
        assert_eq!(sim.peek_word(CODE).unwrap(), 0x3D60_8000);
        assert_eq!(sim.peek_word(CODE + 4).unwrap(), 0x616B_0000);
        hook.disable().unwrap();
        assert_eq!(sim.peek_word(CODE).unwrap(), PROLOGUE[0]);
    }

    #[test]
    fn test_without_original_words() {
        let (_, memory) = setup();
        let hook = AssemblyHook::create(memory, CODE, vec![0x6000_0000], false).unwrap();
        assert_eq!(hook.block_words(), &[0x6000_0000, 0x4880_0012]);
    }

    #[test]
    fn test_bad_instruction_allocates_nothing() {
        let (sim, memory) = setup();
        let result = AssemblyHook::assemble(memory, CODE, &["li r3, 1", "bogus"], false);

        assert!(matches!(
            result,
            Err(PatchError::Assemble(AssembleError::InvalidMnemonic { .. }))
        ));
        assert_eq!(sim.stats().allocations, 0);
    }

    #[test]
    fn test_unmapped_address_allocates_nothing() {
        let (sim, memory) = setup();
        for keep_original in [true, false] {
            let result = AssemblyHook::create(memory.clone(), Address::new(0x100), vec![0x6000_0000], keep_original);
            assert!(matches!(result, Err(PatchError::Memory(MemoryError::Unmapped(0x100)))));
        }
        assert_eq!(sim.stats().allocations, 0);
    }
}
