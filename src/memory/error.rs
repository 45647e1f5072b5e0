// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Address {0:#010x} is not mapped")]
    Unmapped(u32),
    #[error("Out of bounds: {len} bytes at {address:#010x} cross the end of the region")]
    OutOfBounds { address: u32, len: usize },
    #[error("Invalid memory range")]
    InvalidRange,
    #[error("Region {0:#010x} overlaps an existing mapping")]
    Overlap(u32),
}
