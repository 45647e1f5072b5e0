// Wed Jan 15 2026 - Alex

use crate::memory::{Address, PhysicalMemory};
use crate::patch::{Hook, PatchError};
use std::sync::Arc;

/// Redirects a function for good: no trampoline, so the replaced code is
/// never reachable through the patch.
///
/// The target function must be at least as long as the jump written over it,
/// up to four words.
#[derive(Debug)]
pub struct DetourPatch {
    hook: Hook,
}

impl DetourPatch {
    pub fn create(memory: Arc<dyn PhysicalMemory>, address: Address, function: Address) -> Result<Self, PatchError> {
        Ok(Self {
            hook: Hook::create(memory, address, function)?,
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::testing::{setup, CODE, HIGH_CODE};

    #[test]
    fn test_detour_allocates_nothing() {
        let (sim, memory) = setup();
        sim.poke_word(CODE, 0x7C08_02A6).unwrap();

        let mut detour = DetourPatch::create(memory, CODE, HIGH_CODE).unwrap();
        detour.enable().unwrap();
        assert_eq!(sim.peek_word(CODE).unwrap(), 0x3D60_0300);

        detour.disable().unwrap();
        assert_eq!(sim.peek_word(CODE).unwrap(), 0x7C08_02A6);
        assert_eq!(sim.stats().allocations, 0);
    }
}
