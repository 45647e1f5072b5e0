// Tue Jan 15 2026 - Alex

pub mod assembler;
pub mod config;
pub mod memory;
pub mod patch;
pub mod ui;
pub mod utils;

pub use assembler::{assemble, AssembleError, Assembler, AssemblerStats};
pub use config::Config;
pub use memory::{Address, MemoryError, PhysicalMemory, SimulatedMemory};
pub use patch::{
    AssemblyHook, DataPatch, DetourPatch, Hook, LinePatch, OriginalFunction, Patch, PatchComponent, PatchError,
    Toggle, TrampolinePatch,
};
