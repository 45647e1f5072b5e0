// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryError, PhysicalMemory};

pub const WORD_SIZE: usize = 4;

/// Reads `len` bytes at effective address `addr`.
pub fn read_bytes(memory: &dyn PhysicalMemory, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
    let physical = memory.effective_to_physical(addr)?;
    let mut buf = vec![0u8; len];
    memory.read_physical(physical, &mut buf)?;
    Ok(buf)
}

/// Reads one big-endian instruction word.
pub fn read_word(memory: &dyn PhysicalMemory, addr: Address) -> Result<u32, MemoryError> {
    let physical = memory.effective_to_physical(addr)?;
    let mut buf = [0u8; WORD_SIZE];
    memory.read_physical(physical, &mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Writes one instruction word and invalidates the instruction cache over it.
pub fn write_instruction(memory: &dyn PhysicalMemory, addr: Address, word: u32) -> Result<(), MemoryError> {
    write_code(memory, addr, &word.to_be_bytes())
}

/// Writes a block of code and invalidates the instruction cache over it.
pub fn write_code(memory: &dyn PhysicalMemory, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
    let physical = memory.effective_to_physical(addr)?;
    memory.write_physical(physical, bytes)?;
    memory.invalidate_instruction_cache(addr, bytes.len());
    Ok(())
}

/// Writes raw data and invalidates the data cache over it.
pub fn write_data(memory: &dyn PhysicalMemory, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
    let physical = memory.effective_to_physical(addr)?;
    memory.write_physical(physical, bytes)?;
    memory.invalidate_data_cache(addr, bytes.len());
    Ok(())
}

/// Allocates a code block, treating exhaustion as unrecoverable.
pub fn allocate_or_abort(memory: &dyn PhysicalMemory, len: usize, purpose: &str) -> Address {
    match memory.allocate_code(len, WORD_SIZE) {
        Some(addr) => addr,
        None => {
            log::error!("Failed to allocate {} bytes for {}", len, purpose);
            std::process::abort();
        }
    }
}

/// Splits an address into its upper and lower halfwords.
pub fn split_address(addr: Address) -> (u16, u16) {
    let value = addr.as_u32();
    ((value >> 16) as u16, (value & 0xFFFF) as u16)
}
