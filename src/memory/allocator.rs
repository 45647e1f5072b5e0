// Tue Jan 13 2026 - Alex

use crate::memory::Address;
use std::collections::BTreeMap;

/// First-fit allocator over registered free ranges, keyed by start address.
pub struct MemoryAllocator {
    free_blocks: BTreeMap<u32, u32>,
}

impl MemoryAllocator {
    pub fn new() -> Self {
        Self {
            free_blocks: BTreeMap::new(),
        }
    }

    pub fn add_free_block(&mut self, start: Address, size: u32) {
        self.free_blocks.insert(start.as_u32(), size);
        self.merge_free_blocks();
    }

    pub fn allocate(&mut self, size: u32, alignment: usize) -> Option<Address> {
        if size == 0 {
            return None;
        }
        let alignment = alignment.max(1);
        let aligned_size = size.checked_add(alignment as u32 - 1)? & !(alignment as u32 - 1);

        let candidate = self.free_blocks.iter().find_map(|(&start, &block_size)| {
            let aligned_start = Address::new(start).align_up(alignment).as_u32();
            let aligned_offset = aligned_start.wrapping_sub(start);
            if aligned_start >= start && aligned_offset as u64 + aligned_size as u64 <= block_size as u64 {
                Some((start, block_size, aligned_start, aligned_offset))
            } else {
                None
            }
        });

        let (start, block_size, aligned_start, aligned_offset) = candidate?;
        self.free_blocks.remove(&start);
        if aligned_offset > 0 {
            self.free_blocks.insert(start, aligned_offset);
        }
        if aligned_offset + aligned_size < block_size {
            self.free_blocks.insert(
                aligned_start + aligned_size,
                block_size - aligned_offset - aligned_size,
            );
        }
        Some(Address::new(aligned_start))
    }

    fn merge_free_blocks(&mut self) {
        let mut merged = BTreeMap::new();
        let mut current: Option<(u32, u32)> = None;
        for (&start, &size) in &self.free_blocks {
            current = match current {
                Some((cur_start, cur_size)) if cur_start as u64 + cur_size as u64 == start as u64 => {
                    Some((cur_start, cur_size + size))
                }
                Some((cur_start, cur_size)) => {
                    merged.insert(cur_start, cur_size);
                    Some((start, size))
                }
                None => Some((start, size)),
            };
        }
        if let Some((start, size)) = current {
            merged.insert(start, size);
        }
        self.free_blocks = merged;
    }
}

impl Default for MemoryAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_aligned() {
        let mut allocator = MemoryAllocator::new();
        allocator.add_free_block(Address::new(0x1002), 0x100);

        let first = allocator.allocate(10, 4).unwrap();
        assert_eq!(first, Address::new(0x1004));
        // rounded up to 12 bytes
        assert_eq!(allocator.allocate(4, 4), Some(Address::new(0x1010)));
    }

    #[test]
    fn test_allocate_exhausted() {
        let mut allocator = MemoryAllocator::new();
        allocator.add_free_block(Address::new(0x1000), 0x10);

        assert!(allocator.allocate(0x10, 4).is_some());
        assert!(allocator.allocate(4, 4).is_none());
        assert!(allocator.allocate(0, 4).is_none());
    }

    #[test]
    fn test_adjacent_free_blocks_merge() {
        let mut allocator = MemoryAllocator::new();
        allocator.add_free_block(Address::new(0x1010), 0x10);
        allocator.add_free_block(Address::new(0x1000), 0x10);

        assert_eq!(allocator.allocate(0x20, 4), Some(Address::new(0x1000)));
    }
}
