// Wed Jan 15 2026 - Alex

//! Reversible code and data patches.
//!
//! Every component captures what it overwrites the first time it is applied
//! and writes through the [`PhysicalMemory`] collaborator, write first and
//! cache invalidation second. A [`Patch`] groups components and toggles them
//! together.

pub mod assembly_hook;
pub mod data;
pub mod detour;
pub mod error;
pub mod hook;
pub mod jump;
pub mod line;
pub mod trampoline;

pub use assembly_hook::AssemblyHook;
pub use data::{DataComponent, DataPatch, Scalar};
pub use detour::DetourPatch;
pub use error::PatchError;
pub use hook::Hook;
pub use jump::{jump, jump_absolute, resolve_branch_chain, JumpForm};
pub use line::{BranchKind, LinePatch};
pub use trampoline::{OriginalFunction, TrampolinePatch};

use crate::memory::{Address, PhysicalMemory};
use std::fmt;
use std::sync::Arc;

/// Something a [`Patch`] can switch on and off.
pub trait Toggle {
    fn enable(&mut self) -> Result<(), PatchError>;

    fn disable(&mut self) -> Result<(), PatchError>;

    fn describe(&self) -> String;
}

pub(crate) fn encode_words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

pub enum PatchComponent {
    Line(LinePatch),
    Hook(Hook),
    Detour(DetourPatch),
    Trampoline(TrampolinePatch),
    AssemblyHook(AssemblyHook),
    Data(Box<dyn DataComponent>),
}

impl PatchComponent {
    pub fn kind(&self) -> &'static str {
        match self {
            PatchComponent::Line(_) => "line",
            PatchComponent::Hook(_) => "hook",
            PatchComponent::Detour(_) => "detour",
            PatchComponent::Trampoline(_) => "trampoline",
            PatchComponent::AssemblyHook(_) => "assembly hook",
            PatchComponent::Data(_) => "data",
        }
    }
}

impl Toggle for PatchComponent {
    fn enable(&mut self) -> Result<(), PatchError> {
        match self {
            PatchComponent::Line(line) => line.enable(),
            PatchComponent::Hook(hook) => hook.enable(),
            PatchComponent::Detour(detour) => detour.enable(),
            PatchComponent::Trampoline(trampoline) => trampoline.enable(),
            PatchComponent::AssemblyHook(hook) => hook.enable(),
            PatchComponent::Data(data) => data.enable(),
        }
    }

    fn disable(&mut self) -> Result<(), PatchError> {
        match self {
            PatchComponent::Line(line) => line.disable(),
            PatchComponent::Hook(hook) => hook.disable(),
            PatchComponent::Detour(detour) => detour.disable(),
            PatchComponent::Trampoline(trampoline) => trampoline.disable(),
            PatchComponent::AssemblyHook(hook) => hook.disable(),
            PatchComponent::Data(data) => data.disable(),
        }
    }

    fn describe(&self) -> String {
        match self {
            PatchComponent::Line(line) => format!("line {:#010x} at {}", line.word(), line.address()),
            PatchComponent::Hook(hook) => format!("hook {} -> {}", hook.source(), hook.target()),
            PatchComponent::Detour(detour) => {
                format!("detour {} -> {}", detour.hook().source(), detour.hook().target())
            }
            PatchComponent::Trampoline(trampoline) => {
                format!("trampoline {} -> {}", trampoline.hook().source(), trampoline.hook().target())
            }
            PatchComponent::AssemblyHook(hook) => format!("assembly hook {} -> {}", hook.hook().source(), hook.block()),
            PatchComponent::Data(data) => data.describe(),
        }
    }
}

impl fmt::Debug for PatchComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A group of components switched as one unit.
///
/// Builder entries that fail are logged and left out, so one bad line does
/// not lose the rest of the group.
pub struct Patch {
    memory: Arc<dyn PhysicalMemory>,
    components: Vec<PatchComponent>,
    enabled: bool,
}

impl Patch {
    pub fn new(memory: Arc<dyn PhysicalMemory>) -> Self {
        Self {
            memory,
            components: Vec::new(),
            enabled: false,
        }
    }

    fn push(mut self, kind: &str, address: Address, component: Result<PatchComponent, PatchError>) -> Self {
        match component {
            Ok(component) => self.components.push(component),
            Err(e) => log::error!("skipping {} at {}: {}", kind, address, e),
        }
        self
    }

    pub fn with_component(mut self, component: PatchComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_line(self, address: Address, instruction: &str) -> Self {
        let line = LinePatch::line(self.memory.clone(), address, instruction).map(PatchComponent::Line);
        self.push("line", address, line)
    }

    pub fn with_lines<S: AsRef<str>>(mut self, address: Address, instructions: &[S]) -> Self {
        match LinePatch::multiline(self.memory.clone(), address, instructions) {
            Ok(lines) => self.components.extend(lines.into_iter().map(PatchComponent::Line)),
            Err(e) => log::error!("skipping lines at {}: {}", address, e),
        }
        self
    }

    pub fn with_hook(self, address: Address, target: Address) -> Self {
        let hook = Hook::create(self.memory.clone(), address, target).map(PatchComponent::Hook);
        self.push("hook", address, hook)
    }

    pub fn with_detour(self, address: Address, function: Address) -> Self {
        let detour = DetourPatch::create(self.memory.clone(), address, function).map(PatchComponent::Detour);
        self.push("detour", address, detour)
    }

    pub fn with_trampoline(self, address: Address, slot: &'static OriginalFunction, replacement: Address) -> Self {
        let trampoline =
            TrampolinePatch::create(self.memory.clone(), address, slot, replacement).map(PatchComponent::Trampoline);
        self.push("trampoline", address, trampoline)
    }

    pub fn with_trampolines(self, trampolines: &[(Address, &'static OriginalFunction, Address)]) -> Self {
        trampolines
            .iter()
            .fold(self, |patch, &(address, slot, replacement)| patch.with_trampoline(address, slot, replacement))
    }

    pub fn with_assembly_hook<S: AsRef<str>>(self, address: Address, instructions: &[S], keep_original: bool) -> Self {
        let hook = AssemblyHook::assemble(self.memory.clone(), address, instructions, keep_original)
            .map(PatchComponent::AssemblyHook);
        self.push("assembly hook", address, hook)
    }

    pub fn with_data<T: Scalar>(self, address: Address, value: T) -> Self {
        let data = DataPatch::create(self.memory.clone(), address, value);
        self.with_component(PatchComponent::Data(Box::new(data)))
    }

    /// Applies every component in order. A no-op when already enabled.
    ///
    /// If a component fails, the ones already applied are restored in
    /// reverse order before the error is returned, and the patch stays
    /// disabled.
    pub fn enable(&mut self) -> Result<(), PatchError> {
        if self.enabled {
            return Ok(());
        }
        self.switch(true)?;
        self.enabled = true;
        log::debug!("enabled patch of {} components", self.components.len());
        Ok(())
    }

    /// Restores every component in order. A no-op when already disabled.
    ///
    /// If a component fails, the ones already restored are re-applied in
    /// reverse order before the error is returned, and the patch stays
    /// enabled.
    pub fn disable(&mut self) -> Result<(), PatchError> {
        if !self.enabled {
            return Ok(());
        }
        self.switch(false)?;
        self.enabled = false;
        log::debug!("disabled patch of {} components", self.components.len());
        Ok(())
    }

    fn switch(&mut self, enable: bool) -> Result<(), PatchError> {
        for index in 0..self.components.len() {
            let result = if enable {
                self.components[index].enable()
            } else {
                self.components[index].disable()
            };

            if let Err(e) = result {
                log::error!(
                    "{} failed on {}: {}",
                    if enable { "enable" } else { "disable" },
                    self.components[index].describe(),
                    e
                );
                self.roll_back(index, enable);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Undoes the first `applied` components, last first.
    fn roll_back(&mut self, applied: usize, enabled: bool) {
        for component in self.components[..applied].iter_mut().rev() {
            let result = if enabled { component.disable() } else { component.enable() };
            if let Err(e) = result {
                log::error!("rollback failed on {}: {}", component.describe(), e);
            }
        }
    }

    pub fn toggle(&mut self) -> Result<(), PatchError> {
        if self.enabled {
            self.disable()
        } else {
            self.enable()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn components(&self) -> &[PatchComponent] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patch")
            .field("components", &self.components)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::memory::{Address, PhysicalMemory, SimulatedMemory};
    use std::sync::Arc;

    /// Within `ba` reach.
    pub const CODE: Address = Address::new(0x0080_0000);
    pub const CODE_PHYSICAL: Address = Address::new(0x1080_0000);
    pub const DATA: Address = Address::new(0x0080_0800);
    pub const DATA_PHYSICAL: Address = Address::new(0x1080_0800);
    /// Past `ba` reach and more than a relative branch away from `CODE`.
    pub const HIGH_CODE: Address = Address::new(0x0300_0000);
    pub const HEAP: Address = Address::new(0x8000_0000);
    pub const HEAP_PHYSICAL: Address = Address::new(0x4000_0000);

    pub fn setup() -> (Arc<SimulatedMemory>, Arc<dyn PhysicalMemory>) {
        let sim = Arc::new(SimulatedMemory::new());
        sim.map_region(CODE, CODE_PHYSICAL, 0x1000).unwrap();
        sim.map_region(HIGH_CODE, Address::new(0x1300_0000), 0x1000).unwrap();
        sim.map_heap(HEAP, HEAP_PHYSICAL, 0x1000).unwrap();
        let memory: Arc<dyn PhysicalMemory> = sim.clone();
        (sim, memory)
    }
}
