// Wed Jan 15 2026 - Alex

use crate::memory::{Address, MemoryAllocator, MemoryError, MemoryRange, PhysicalMemory};
use parking_lot::Mutex;

/// One observable operation performed against a [`SimulatedMemory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryEvent {
    Read { physical: Address, len: usize },
    Write { physical: Address, len: usize },
    InvalidateInstructionCache { addr: Address, len: usize },
    InvalidateDataCache { addr: Address, len: usize },
    Allocate { addr: Address, len: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub reads: usize,
    pub writes: usize,
    pub icache_invalidations: usize,
    pub dcache_invalidations: usize,
    pub allocations: usize,
}

struct Region {
    effective: MemoryRange,
    physical: MemoryRange,
    bytes: Vec<u8>,
}

struct Inner {
    regions: Vec<Region>,
    heap: MemoryAllocator,
    events: Vec<MemoryEvent>,
}

impl Inner {
    fn region_by_effective(&self, addr: Address, len: usize) -> Result<(usize, usize), MemoryError> {
        self.locate(addr, len, |region| &region.effective)
    }

    fn region_by_physical(&self, addr: Address, len: usize) -> Result<(usize, usize), MemoryError> {
        self.locate(addr, len, |region| &region.physical)
    }

    fn locate<F>(&self, addr: Address, len: usize, range_of: F) -> Result<(usize, usize), MemoryError>
    where
        F: Fn(&Region) -> &MemoryRange,
    {
        let (index, region) = self
            .regions
            .iter()
            .enumerate()
            .find(|(_, region)| range_of(region).contains(addr))
            .ok_or(MemoryError::Unmapped(addr.as_u32()))?;

        let range = range_of(region);
        if !range.contains_span(addr, len.max(1)) {
            return Err(MemoryError::OutOfBounds { address: addr.as_u32(), len });
        }
        Ok((index, range.offset_of(addr)))
    }

    fn read(&self, physical: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        let (index, offset) = self.region_by_physical(physical, buf.len())?;
        buf.copy_from_slice(&self.regions[index].bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, physical: Address, data: &[u8]) -> Result<(), MemoryError> {
        let (index, offset) = self.region_by_physical(physical, data.len())?;
        self.regions[index].bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

/// Host-side stand-in for the target's memory: big-endian mapped regions, a
/// code heap, and a journal of every read, write and cache invalidation.
pub struct SimulatedMemory {
    inner: Mutex<Inner>,
}

impl SimulatedMemory {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                regions: Vec::new(),
                heap: MemoryAllocator::new(),
                events: Vec::new(),
            }),
        }
    }

    /// Maps `size` zeroed bytes at `effective`, backed by `physical`.
    pub fn map_region(&self, effective: Address, physical: Address, size: u32) -> Result<(), MemoryError> {
        if size == 0 || effective.as_u32().checked_add(size).is_none() || physical.as_u32().checked_add(size).is_none() {
            return Err(MemoryError::InvalidRange);
        }
        let effective_range = MemoryRange::from_start_size(effective, size);
        let physical_range = MemoryRange::from_start_size(physical, size);

        let mut inner = self.inner.lock();
        for region in &inner.regions {
            if region.effective.overlaps(&effective_range) {
                return Err(MemoryError::Overlap(effective.as_u32()));
            }
            if region.physical.overlaps(&physical_range) {
                return Err(MemoryError::Overlap(physical.as_u32()));
            }
        }
        inner.regions.push(Region {
            effective: effective_range,
            physical: physical_range,
            bytes: vec![0; size as usize],
        });
        Ok(())
    }

    /// Maps a region and hands it to the code allocator.
    pub fn map_heap(&self, effective: Address, physical: Address, size: u32) -> Result<(), MemoryError> {
        self.map_region(effective, physical, size)?;
        self.inner.lock().heap.add_free_block(effective, size);
        Ok(())
    }

    pub fn peek_word(&self, addr: Address) -> Result<u32, MemoryError> {
        let mut buf = [0u8; 4];
        self.peek(addr, &mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn poke_word(&self, addr: Address, word: u32) -> Result<(), MemoryError> {
        self.poke(addr, &word.to_be_bytes())
    }

    /// Reads by effective address without touching the journal.
    pub fn peek(&self, addr: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        let inner = self.inner.lock();
        let (index, offset) = inner.region_by_effective(addr, buf.len())?;
        buf.copy_from_slice(&inner.regions[index].bytes[offset..offset + buf.len()]);
        Ok(())
    }

    /// Writes by effective address without touching the journal.
    pub fn poke(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let mut inner = self.inner.lock();
        let (index, offset) = inner.region_by_effective(addr, data.len())?;
        inner.regions[index].bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn events(&self) -> Vec<MemoryEvent> {
        self.inner.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.inner.lock().events.clear();
    }

    pub fn stats(&self) -> MemoryStats {
        let inner = self.inner.lock();
        let mut stats = MemoryStats::default();
        for event in &inner.events {
            match event {
                MemoryEvent::Read { .. } => stats.reads += 1,
                MemoryEvent::Write { .. } => stats.writes += 1,
                MemoryEvent::InvalidateInstructionCache { .. } => stats.icache_invalidations += 1,
                MemoryEvent::InvalidateDataCache { .. } => stats.dcache_invalidations += 1,
                MemoryEvent::Allocate { .. } => stats.allocations += 1,
            }
        }
        stats
    }
}

impl Default for SimulatedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalMemory for SimulatedMemory {
    fn effective_to_physical(&self, addr: Address) -> Result<Address, MemoryError> {
        let inner = self.inner.lock();
        let region = inner
            .regions
            .iter()
            .find(|region| region.effective.contains(addr))
            .ok_or(MemoryError::Unmapped(addr.as_u32()))?;
        Ok(region.physical.start() + region.effective.offset_of(addr) as u32)
    }

    fn read_physical(&self, src: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        let mut inner = self.inner.lock();
        inner.read(src, buf)?;
        inner.events.push(MemoryEvent::Read { physical: src, len: buf.len() });
        Ok(())
    }

    fn write_physical(&self, dst: Address, data: &[u8]) -> Result<(), MemoryError> {
        let mut inner = self.inner.lock();
        inner.write(dst, data)?;
        inner.events.push(MemoryEvent::Write { physical: dst, len: data.len() });
        Ok(())
    }

    fn invalidate_instruction_cache(&self, addr: Address, len: usize) {
        self.inner.lock().events.push(MemoryEvent::InvalidateInstructionCache { addr, len });
    }

    fn invalidate_data_cache(&self, addr: Address, len: usize) {
        self.inner.lock().events.push(MemoryEvent::InvalidateDataCache { addr, len });
    }

    fn allocate_code(&self, len: usize, alignment: usize) -> Option<Address> {
        let mut inner = self.inner.lock();
        let addr = inner.heap.allocate(u32::try_from(len).ok()?, alignment)?;
        inner.events.push(MemoryEvent::Allocate { addr, len });
        Some(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_to_physical() {
        let memory = SimulatedMemory::new();
        memory.map_region(Address::new(0x0200_0000), Address::new(0x3200_0000), 0x100).unwrap();

        assert_eq!(
            memory.effective_to_physical(Address::new(0x0200_0040)).unwrap(),
            Address::new(0x3200_0040)
        );
        assert!(memory.effective_to_physical(Address::new(0x0200_0100)).is_err());
    }

    #[test]
    fn test_words_are_big_endian() {
        let memory = SimulatedMemory::new();
        memory.map_region(Address::new(0x1000), Address::new(0x9000), 0x10).unwrap();
        memory.poke_word(Address::new(0x1000), 0x1234_5678).unwrap();

        let mut bytes = [0u8; 4];
        memory.peek(Address::new(0x1000), &mut bytes).unwrap();
        assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78]);
        assert!(memory.events().is_empty());
    }

    #[test]
    fn test_rejects_overlapping_regions() {
        let memory = SimulatedMemory::new();
        memory.map_region(Address::new(0x1000), Address::new(0x9000), 0x100).unwrap();
        assert_eq!(
            memory.map_region(Address::new(0x1080), Address::new(0xA000), 0x100),
            Err(MemoryError::Overlap(0x1080))
        );
        assert_eq!(
            memory.map_region(Address::new(0x2000), Address::new(0x9080), 0x100),
            Err(MemoryError::Overlap(0x9080))
        );
    }

    #[test]
    fn test_access_crossing_region_end() {
        let memory = SimulatedMemory::new();
        memory.map_region(Address::new(0x1000), Address::new(0x9000), 0x10).unwrap();
        assert_eq!(
            memory.write_physical(Address::new(0x900E), &[0; 4]),
            Err(MemoryError::OutOfBounds { address: 0x900E, len: 4 })
        );
    }

    #[test]
    fn test_journal_and_stats() {
        let memory = SimulatedMemory::new();
        memory.map_region(Address::new(0x1000), Address::new(0x9000), 0x20).unwrap();
        memory.poke_word(Address::new(0x1000), 0xDEAD_BEEF).unwrap();

        let mut word = [0u8; 4];
        memory.read_physical(Address::new(0x9000), &mut word).unwrap();
        memory.write_physical(Address::new(0x9010), &word).unwrap();
        memory.invalidate_instruction_cache(Address::new(0x1010), 4);

        assert_eq!(memory.peek_word(Address::new(0x1010)).unwrap(), 0xDEAD_BEEF);
        let stats = memory.stats();
        assert_eq!(stats.reads, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.icache_invalidations, 1);
        assert_eq!(stats.dcache_invalidations, 0);

        memory.clear_events();
        assert_eq!(memory.stats(), MemoryStats::default());
    }

    #[test]
    fn test_allocate_code_from_heap() {
        let memory = SimulatedMemory::new();
        memory.map_heap(Address::new(0x1000_0000), Address::new(0x5000_0000), 0x20).unwrap();

        let block = memory.allocate_code(0x10, 4).unwrap();
        assert_eq!(block, Address::new(0x1000_0000));
        assert!(memory.allocate_code(0x20, 4).is_none());
        assert_eq!(memory.stats().allocations, 1);
    }
}
