//! # 32-bit linear addresses
//!
//! Table bases, the TSS base and handler entry points are all linear addresses
//! on i386. Keeping them in a newtype stops a selector or a limit from sneaking
//! into a base field.

use core::fmt;

/// A 32-bit linear (segment base + offset, pre-paging) address.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LinearAddress(u32);

impl LinearAddress {
    #[inline]
    #[must_use]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Address of a kernel object.
    ///
    /// Lossless on i386. On a 64-bit host only the low 32 bits survive, which
    /// is fine for tables that are built there but never loaded.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<u8>().addr() as u32)
    }

    /// Entry address of an interrupt handler stub.
    #[inline]
    #[must_use]
    pub fn from_handler(handler: unsafe extern "C" fn()) -> Self {
        Self::from_ptr(handler as *const ())
    }
}

impl From<u32> for LinearAddress {
    #[inline]
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}

impl From<LinearAddress> for u32 {
    #[inline]
    fn from(addr: LinearAddress) -> Self {
        addr.0
    }
}

impl fmt::Debug for LinearAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinearAddress({:#010x})", self.0)
    }
}

impl fmt::LowerHex for LinearAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_hex() {
        let addr = LinearAddress::new(0x0010_2000);
        assert_eq!(format!("{addr:#x}"), "0x102000");
        assert_eq!(format!("{addr:?}"), "LinearAddress(0x00102000)");
    }

    #[test]
    fn from_ptr_keeps_low_bits() {
        let value = 7u32;
        let ptr = &raw const value;
        #[allow(clippy::cast_possible_truncation)]
        let expected = ptr.addr() as u32;
        assert_eq!(LinearAddress::from_ptr(ptr).as_u32(), expected);
    }
}
