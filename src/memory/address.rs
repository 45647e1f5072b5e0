// Tue Jan 13 2026 - Alex

use std::fmt;
use std::ops::{Add, Sub};

/// A 32-bit effective or physical address on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address {
    value: u32,
}

impl Address {
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    pub const fn as_u32(&self) -> u32 {
        self.value
    }

    pub fn is_aligned(&self, alignment: usize) -> bool {
        alignment == 0 || self.value % alignment as u32 == 0
    }

    pub fn align_down(&self, alignment: usize) -> Self {
        Self { value: self.value & !(alignment as u32 - 1) }
    }

    pub fn align_up(&self, alignment: usize) -> Self {
        Self { value: self.value.wrapping_add(alignment as u32 - 1) & !(alignment as u32 - 1) }
    }

    pub fn offset(&self, offset: i32) -> Self {
        Self { value: self.value.wrapping_add(offset as u32) }
    }

    /// Signed distance `self - other`, computed in 64 bits so it never wraps.
    pub fn distance(&self, other: Self) -> i64 {
        self.value as i64 - other.value as i64
    }

    /// Address of the `index`th instruction word starting here.
    pub fn word(&self, index: usize) -> Self {
        Self { value: self.value.wrapping_add((index * 4) as u32) }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<u32> for Address {
    type Output = Self;
    fn add(self, rhs: u32) -> Self::Output {
        Self { value: self.value.wrapping_add(rhs) }
    }
}

impl Sub<u32> for Address {
    type Output = Self;
    fn sub(self, rhs: u32) -> Self::Output {
        Self { value: self.value.wrapping_sub(rhs) }
    }
}

impl Sub<Address> for Address {
    type Output = i64;
    fn sub(self, rhs: Address) -> Self::Output {
        self.distance(rhs)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_alignment() {
        let addr = Address::new(0x0200_0006);
        assert!(!addr.is_aligned(4));
        assert_eq!(addr.align_down(4), Address::new(0x0200_0004));
        assert_eq!(addr.align_up(4), Address::new(0x0200_0008));
    }

    #[test]
    fn test_address_word_and_distance() {
        let base = Address::new(0x0100_0000);
        assert_eq!(base.word(3), Address::new(0x0100_000C));
        assert_eq!(Address::new(0x10).distance(Address::new(0x20)), -0x10);
        assert_eq!(format!("{}", base), "0x01000000");
    }
}
