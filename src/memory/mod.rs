// Tue Jan 13 2026 - Alex

pub mod access;
pub mod address;
pub mod allocator;
pub mod error;
pub mod range;
pub mod simulated;
pub mod traits;

pub use access::{read_word, write_data, write_instruction, WORD_SIZE};
pub use address::Address;
pub use allocator::MemoryAllocator;
pub use error::MemoryError;
pub use range::MemoryRange;
pub use simulated::{MemoryEvent, MemoryStats, SimulatedMemory};
pub use traits::PhysicalMemory;
