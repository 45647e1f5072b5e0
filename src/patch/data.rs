// Wed Jan 15 2026 - Alex

use crate::memory::access::read_bytes;
use crate::memory::{write_data, Address, PhysicalMemory};
use crate::patch::{PatchError, Toggle};
use std::fmt;
use std::sync::Arc;

/// Plain values a data patch can store, in target (big-endian) byte order.
pub trait Scalar: Copy + Send + fmt::Debug + 'static {
    const SIZE: usize;

    fn to_be_vec(self) -> Vec<u8>;

    /// `bytes` holds exactly `SIZE` bytes.
    fn from_be_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn to_be_vec(self) -> Vec<u8> {
                    self.to_be_bytes().to_vec()
                }

                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_be_bytes(buf)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

mod sealed {
    pub trait Sealed {}
}

/// A [`DataPatch`] of any width, boxed into a `Patch`. Sealed, so nothing
/// else can ride in the data slot.
pub trait DataComponent: Toggle + Send + sealed::Sealed {}

impl<T: Scalar> sealed::Sealed for DataPatch<T> {}

impl<T: Scalar> DataComponent for DataPatch<T> {}

/// Pokes one scalar at a fixed address; the previous value is captured on
/// first use, the same way `LinePatch` captures its word.
pub struct DataPatch<T: Scalar> {
    memory: Arc<dyn PhysicalMemory>,
    address: Address,
    value: T,
    original: Option<T>,
}

impl<T: Scalar> DataPatch<T> {
    pub fn create(memory: Arc<dyn PhysicalMemory>, address: Address, value: T) -> Self {
        Self {
            memory,
            address,
            value,
            original: None,
        }
    }

    fn ensure_captured(&mut self) -> Result<T, PatchError> {
        if let Some(original) = self.original {
            return Ok(original);
        }
        let bytes = read_bytes(self.memory.as_ref(), self.address, T::SIZE)?;
        let original = T::from_be_slice(&bytes);
        self.original = Some(original);
        Ok(original)
    }

    fn apply(&mut self, enable: bool) -> Result<(), PatchError> {
        let original = self.ensure_captured()?;
        let value = if enable { self.value } else { original };
        write_data(self.memory.as_ref(), self.address, &value.to_be_vec())?;
        Ok(())
    }

    pub fn enable(&mut self) -> Result<(), PatchError> {
        self.apply(true)
    }

    pub fn disable(&mut self) -> Result<(), PatchError> {
        self.apply(false)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn original(&self) -> Option<T> {
        self.original
    }
}

impl<T: Scalar> Toggle for DataPatch<T> {
    fn enable(&mut self) -> Result<(), PatchError> {
        DataPatch::enable(self)
    }

    fn disable(&mut self) -> Result<(), PatchError> {
        DataPatch::disable(self)
    }

    fn describe(&self) -> String {
        format!("data {:?} at {}", self.value, self.address)
    }
}
