// Tue Jan 13 2026 - Alex

use crate::memory::Address;
use std::fmt;

/// Half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRange {
    start: Address,
    end: Address,
}

impl MemoryRange {
    pub fn new(start: Address, end: Address) -> Self {
        assert!(end.as_u32() >= start.as_u32(), "end must be >= start");
        Self { start, end }
    }

    pub fn from_start_size(start: Address, size: u32) -> Self {
        Self::new(start, start + size)
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u32 {
        self.end.as_u32() - self.start.as_u32()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.as_u32() >= self.start.as_u32() && addr.as_u32() < self.end.as_u32()
    }

    /// True when all of `[addr, addr + len)` lies inside this range.
    pub fn contains_span(&self, addr: Address, len: usize) -> bool {
        let end = addr.as_u32() as u64 + len as u64;
        self.contains(addr) && end <= self.end.as_u32() as u64
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.as_u32() < other.end.as_u32() && self.end.as_u32() > other.start.as_u32()
    }

    /// Byte offset of `addr` from the start of the range.
    pub fn offset_of(&self, addr: Address) -> usize {
        (addr.as_u32() - self.start.as_u32()) as usize
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_spans() {
        let range = MemoryRange::from_start_size(Address::new(0x1000), 0x100);
        assert!(range.contains_span(Address::new(0x10FC), 4));
        assert!(!range.contains_span(Address::new(0x10FE), 4));
        assert!(!range.contains(Address::new(0x1100)));
        assert_eq!(range.offset_of(Address::new(0x1010)), 0x10);
    }

    #[test]
    fn test_range_overlap() {
        let a = MemoryRange::from_start_size(Address::new(0x1000), 0x100);
        let b = MemoryRange::from_start_size(Address::new(0x10F0), 0x100);
        let c = MemoryRange::from_start_size(Address::new(0x1100), 0x100);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
