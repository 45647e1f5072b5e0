// Wed Jan 15 2026 - Alex

use crate::memory::{Address, PhysicalMemory};
use crate::patch::jump::{jump_form, jump_patches, JumpForm};
use crate::patch::{LinePatch, PatchError};
use std::sync::Arc;

/// A jump from `source` to `target`, installed as one line patch per word.
#[derive(Debug)]
pub struct Hook {
    source: Address,
    target: Address,
    form: JumpForm,
    lines: Vec<LinePatch>,
}

impl Hook {
    pub fn create(memory: Arc<dyn PhysicalMemory>, source: Address, target: Address) -> Result<Self, PatchError> {
        let form = jump_form(source, target);
        let lines = jump_patches(&memory, source, target)?;
        log::debug!("{} jump {} -> {} ({} words)", form, source, target, lines.len());

        Ok(Self {
            source,
            target,
            form,
            lines,
        })
    }

    pub fn enable(&mut self) -> Result<(), PatchError> {
        self.switch(true)
    }

    pub fn disable(&mut self) -> Result<(), PatchError> {
        self.switch(false)
    }

    /// Writes every word or none: a partly written long jump is put back
    /// before the error is returned.
    fn switch(&mut self, enable: bool) -> Result<(), PatchError> {
        for index in 0..self.lines.len() {
            let line = &mut self.lines[index];
            let result = if enable { line.enable() } else { line.disable() };

            if let Err(e) = result {
                for written in self.lines[..index].iter_mut().rev() {
                    let undo = if enable { written.disable() } else { written.enable() };
                    if let Err(undo_err) = undo {
                        log::error!("could not undo word at {}: {}", written.address(), undo_err);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn source(&self) -> Address {
        self.source
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn form(&self) -> JumpForm {
        self.form
    }

    pub fn lines(&self) -> &[LinePatch] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First address past the overwritten words.
    pub fn resume_address(&self) -> Address {
        self.source.word(self.lines.len())
    }

    pub fn words(&self) -> Vec<u32> {
        self.lines.iter().map(LinePatch::word).collect()
    }

    /// The words the hook overwrites, captured or read live.
    pub fn original_words(&self) -> Result<Vec<u32>, PatchError> {
        self.lines.iter().map(LinePatch::original_word).collect()
    }
}
