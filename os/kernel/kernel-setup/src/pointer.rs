//! # Descriptor-table pointer (`lgdt`/`lidt` operand)

use crate::addresses::LinearAddress;
use core::fmt;
use kernel_info::layout::TABLE_POINTER_SIZE;

/// Pointer format required by `lgdt` and `lidt`.
///
/// The CPU reads exactly `limit + 1` bytes starting at `base`.
#[repr(C, packed)]
#[derive(Copy, Clone)]
pub struct TablePointer {
    /// Size of the table **minus one** in bytes.
    limit: u16,
    /// Linear address of the first entry.
    base: LinearAddress,
}

impl TablePointer {
    /// All-zero pointer; not valid for loading.
    pub const EMPTY: Self = Self::new(0, LinearAddress::zero());

    #[inline]
    #[must_use]
    pub const fn new(limit: u16, base: LinearAddress) -> Self {
        Self { limit, base }
    }

    /// Pointer covering all of `table`.
    ///
    /// # Panics
    /// If `T` is larger than 64 KiB, which no descriptor table can be.
    #[inline]
    #[must_use]
    pub fn for_table<T>(table: &T) -> Self {
        let Ok(limit) = u16::try_from(size_of::<T>() - 1) else {
            panic!("descriptor table larger than 64 KiB");
        };
        Self::new(limit, LinearAddress::from_ptr(table))
    }

    #[inline]
    #[must_use]
    pub const fn limit(&self) -> u16 {
        self.limit
    }

    #[inline]
    #[must_use]
    pub const fn base(&self) -> LinearAddress {
        self.base
    }

    /// The exact six bytes handed to `lgdt`/`lidt`.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; TABLE_POINTER_SIZE] {
        let limit = self.limit.to_le_bytes();
        let base = self.base.as_u32().to_le_bytes();
        [limit[0], limit[1], base[0], base[1], base[2], base[3]]
    }
}

impl PartialEq for TablePointer {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for TablePointer {}

impl fmt::Debug for TablePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TablePointer")
            .field("limit", &self.limit())
            .field("base", &self.base())
            .finish()
    }
}

const _: () = assert!(size_of::<TablePointer>() == TABLE_POINTER_SIZE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_limit_then_base() {
        let ptr = TablePointer::new(0x2F, LinearAddress::new(0x0010_2000));
        assert_eq!(ptr.to_bytes(), [0x2F, 0x00, 0x00, 0x20, 0x10, 0x00]);
    }

    #[test]
    fn covers_whole_table() {
        let table = [0u64; 6];
        let ptr = TablePointer::for_table(&table);
        assert_eq!(ptr.limit(), 47);
        assert_eq!(ptr.base(), LinearAddress::from_ptr(&raw const table));
    }

    #[test]
    fn limit_reaches_64k() {
        let table = [0u8; 1 << 16];
        assert_eq!(TablePointer::for_table(&table).limit(), u16::MAX);
    }

    #[test]
    #[should_panic(expected = "descriptor table larger than 64 KiB")]
    fn rejects_oversized_table() {
        let table = [0u8; (1 << 16) + 1];
        let _ = TablePointer::for_table(&table);
    }
}
