// Wed Jan 15 2026 - Alex

use crate::memory::{Address, MemoryError};

/// The memory and cache primitives the patch engine is built on.
///
/// Addresses passed to the `*_physical` methods are physical; everything else
/// takes effective addresses. `read_physical`/`write_physical` are the
/// physical copy with a host-side staging buffer as one of its ends.
///
/// Writes and cache invalidations are issued by callers as pairs, write first.
pub trait PhysicalMemory: Send + Sync {
    fn effective_to_physical(&self, addr: Address) -> Result<Address, MemoryError>;

    fn read_physical(&self, src: Address, buf: &mut [u8]) -> Result<(), MemoryError>;

    fn write_physical(&self, dst: Address, data: &[u8]) -> Result<(), MemoryError>;

    fn invalidate_instruction_cache(&self, addr: Address, len: usize);

    fn invalidate_data_cache(&self, addr: Address, len: usize);

    /// Reserves executable memory for relocated code. `None` means the heap
    /// is exhausted.
    fn allocate_code(&self, len: usize, alignment: usize) -> Option<Address>;
}
