//! # 32-bit segment descriptor codec
//!
//! One GDT entry is 8 bytes; base and limit are scattered across it for
//! 80286 compatibility:
//!
//! ```text
//!  63      56 55  52 51  48 47      40 39                    16 15            0
//! +----------+------+------+----------+------------------------+---------------+
//! | base_hi  | flags| lim_h|  access  |      base[23:0]        |  limit[15:0]  |
//! +----------+------+------+----------+------------------------+---------------+
//! ```
//!
//! * **access**: `P | DPL(2) | S | type(4)`
//! * **flags**: `G | D/B | L | AVL` (`G` scales the limit by 4 KiB)
//!
//! [`encode_entry`] is the raw `(base, limit, flags, access)` packer; the typed
//! builders ([`AccessByte`], [`SegmentFlags`]) spell out the common cases.

use crate::addresses::LinearAddress;
use crate::privilege::Dpl;
use bitfield_struct::bitfield;
use kernel_info::layout::{GDT_ENTRY_SIZE, SEGMENT_LIMIT_MAX};

/// Code segment type: execute + read.
pub const TYPE_CODE_EXEC_READ: u8 = 0b1010;

/// Data segment type: read + write, expand-up.
pub const TYPE_DATA_READ_WRITE: u8 = 0b0010;

/// System segment type: available 32-bit TSS.
pub const TYPE_TSS_AVAILABLE_32: u8 = 0b1001;

/// The access byte (bits 40..48 of a descriptor).
#[bitfield(u8)]
#[derive(Eq, PartialEq)]
pub struct AccessByte {
    /// Segment type; meaning depends on `s`.
    #[bits(4)]
    pub typ: u8,
    /// Descriptor class: `true` for code/data, `false` for system (TSS, LDT).
    pub s: bool,
    #[bits(2)]
    pub dpl: Dpl,
    pub present: bool,
}

impl AccessByte {
    /// Present, execute/read code segment.
    #[inline]
    #[must_use]
    pub const fn code(dpl: Dpl) -> Self {
        Self::new()
            .with_typ(TYPE_CODE_EXEC_READ)
            .with_s(true)
            .with_dpl(dpl)
            .with_present(true)
    }

    /// Present, read/write data segment.
    #[inline]
    #[must_use]
    pub const fn data(dpl: Dpl) -> Self {
        Self::new()
            .with_typ(TYPE_DATA_READ_WRITE)
            .with_s(true)
            .with_dpl(dpl)
            .with_present(true)
    }

    /// Present, available 32-bit TSS (ring 0).
    #[inline]
    #[must_use]
    pub const fn tss_available() -> Self {
        Self::new()
            .with_typ(TYPE_TSS_AVAILABLE_32)
            .with_s(false)
            .with_dpl(Dpl::Ring0)
            .with_present(true)
    }
}

/// The flags nibble (bits 52..56 of a descriptor).
#[bitfield(u8)]
#[derive(Eq, PartialEq)]
pub struct SegmentFlags {
    /// Available for system software.
    pub avl: bool,
    /// 64-bit code; always clear on i386.
    pub long: bool,
    /// Default operand size: `true` for 32-bit segments.
    pub db: bool,
    /// Limit is in 4 KiB units instead of bytes.
    pub granularity: bool,
    #[bits(4)]
    __: u8,
}

impl SegmentFlags {
    /// 32-bit, page granular (`0xC`): with limit `0xFFFFF` this spans 4 GiB.
    #[inline]
    #[must_use]
    pub const fn flat32() -> Self {
        Self::new().with_db(true).with_granularity(true)
    }

    /// Byte granular, no size bit (`0x0`); used for the TSS descriptor.
    #[inline]
    #[must_use]
    pub const fn byte_granular() -> Self {
        Self::new()
    }
}

/// Bit view of one 8-byte segment descriptor.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct SegmentDescriptorBits {
    /// Bits 0..16.
    pub limit_lo: u16,
    /// Bits 16..40.
    #[bits(24)]
    pub base_lo: u32,
    /// Bits 40..48.
    #[bits(8)]
    pub access: AccessByte,
    /// Bits 48..52.
    #[bits(4)]
    pub limit_hi: u8,
    /// Bits 52..56.
    #[bits(4)]
    pub flags: SegmentFlags,
    /// Bits 56..64.
    pub base_hi: u8,
}

/// A single 8-byte GDT entry.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SegmentDescriptor(SegmentDescriptorBits);

impl SegmentDescriptor {
    /// The all-zero descriptor required at GDT index 0.
    pub const NULL: Self = Self(SegmentDescriptorBits::new());

    /// Pack a descriptor from its logical fields.
    ///
    /// # Panics
    /// If `limit` does not fit in 20 bits.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(
        base: LinearAddress,
        limit: u32,
        flags: SegmentFlags,
        access: AccessByte,
    ) -> Self {
        assert!(limit <= SEGMENT_LIMIT_MAX, "segment limit exceeds 20 bits");
        let base = base.as_u32();

        let bits = SegmentDescriptorBits::new()
            .with_limit_lo((limit & 0xFFFF) as u16)
            .with_base_lo(base & 0x00FF_FFFF)
            .with_access(access)
            .with_limit_hi(((limit >> 16) & 0xF) as u8)
            .with_flags(flags)
            .with_base_hi((base >> 24) as u8);
        Self(bits)
    }

    /// Flat 4 GiB segment starting at 0.
    #[inline]
    #[must_use]
    pub const fn flat(access: AccessByte) -> Self {
        Self::new(
            LinearAddress::zero(),
            SEGMENT_LIMIT_MAX,
            SegmentFlags::flat32(),
            access,
        )
    }

    /// System descriptor pointing at a 32-bit TSS.
    #[inline]
    #[must_use]
    pub const fn tss(base: LinearAddress, limit: u32) -> Self {
        Self::new(
            base,
            limit,
            SegmentFlags::byte_granular(),
            AccessByte::tss_available(),
        )
    }

    #[inline]
    #[must_use]
    pub const fn base(self) -> LinearAddress {
        LinearAddress::new(self.0.base_lo() | ((self.0.base_hi() as u32) << 24))
    }

    #[inline]
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.0.limit_lo() as u32 | ((self.0.limit_hi() as u32) << 16)
    }

    #[inline]
    #[must_use]
    pub const fn access(self) -> AccessByte {
        self.0.access()
    }

    #[inline]
    #[must_use]
    pub const fn flags(self) -> SegmentFlags {
        self.0.flags()
    }

    #[inline]
    #[must_use]
    pub const fn is_present(self) -> bool {
        self.0.access().present()
    }

    #[inline]
    #[must_use]
    pub const fn dpl(self) -> Dpl {
        self.0.access().dpl()
    }

    #[inline]
    #[must_use]
    pub const fn to_u64(self) -> u64 {
        self.0.into_bits()
    }

    /// The exact bytes the CPU reads from the table.
    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; GDT_ENTRY_SIZE] {
        self.0.into_bits().to_le_bytes()
    }

    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; GDT_ENTRY_SIZE]) -> Self {
        Self(SegmentDescriptorBits::from_bits(u64::from_le_bytes(bytes)))
    }
}

impl Default for SegmentDescriptor {
    fn default() -> Self {
        Self::NULL
    }
}

/// Pack `(base, limit, granularity, access)` into a descriptor.
///
/// `granularity` is the raw flags nibble, `access` the raw access byte.
///
/// # Panics
/// If `limit` exceeds 20 bits or `granularity` exceeds 4 bits.
#[must_use]
pub const fn encode_entry(base: u32, limit: u32, granularity: u8, access: u8) -> SegmentDescriptor {
    assert!(granularity <= 0xF, "granularity is a 4-bit field");
    SegmentDescriptor::new(
        LinearAddress::new(base),
        limit,
        SegmentFlags::from_bits(granularity),
        AccessByte::from_bits(access),
    )
}

const _: () = {
    assert!(size_of::<SegmentDescriptorBits>() == GDT_ENTRY_SIZE);
    assert!(size_of::<SegmentDescriptor>() == GDT_ENTRY_SIZE);
    assert!(size_of::<AccessByte>() == 1);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_code_literal_bytes() {
        let desc = encode_entry(0, 0xF_FFFF, 0xC, 0x9A);
        assert_eq!(
            desc.to_bytes(),
            [0xFF, 0xFF, 0x00, 0x00, 0x00, 0x9A, 0xCF, 0x00]
        );
        assert_eq!(desc.base().as_u32(), 0);
        assert_eq!(desc.limit(), 0xF_FFFF);
        assert_eq!(desc.flags().into_bits(), 0xC);
        assert_eq!(desc.access().into_bits(), 0x9A);
    }

    #[test]
    fn base_and_limit_are_split() {
        let desc = encode_entry(0x1234_5678, 0xA_BCDE, 0x0, 0x89);
        assert_eq!(
            desc.to_bytes(),
            [0xDE, 0xBC, 0x78, 0x56, 0x34, 0x89, 0x0A, 0x12]
        );
        assert_eq!(desc.base().as_u32(), 0x1234_5678);
        assert_eq!(desc.limit(), 0xA_BCDE);
    }

    #[test]
    fn typed_access_bytes_match_raw_values() {
        assert_eq!(AccessByte::code(Dpl::Ring0).into_bits(), 0x9A);
        assert_eq!(AccessByte::data(Dpl::Ring0).into_bits(), 0x92);
        assert_eq!(AccessByte::code(Dpl::Ring3).into_bits(), 0xFA);
        assert_eq!(AccessByte::data(Dpl::Ring3).into_bits(), 0xF2);
        assert_eq!(AccessByte::tss_available().into_bits(), 0x89);
        assert_eq!(SegmentFlags::flat32().into_bits(), 0xC);
    }

    #[test]
    fn flat_equals_raw_encoding() {
        assert_eq!(
            SegmentDescriptor::flat(AccessByte::data(Dpl::Ring3)),
            encode_entry(0, 0xF_FFFF, 0xC, 0xF2)
        );
    }

    #[test]
    fn null_is_all_zero() {
        assert_eq!(SegmentDescriptor::NULL.to_u64(), 0);
        assert!(!SegmentDescriptor::NULL.is_present());
    }

    #[test]
    fn bytes_decode_back() {
        let desc = SegmentDescriptor::flat(AccessByte::code(Dpl::Ring3));
        let back = SegmentDescriptor::from_bytes(desc.to_bytes());
        assert_eq!(back.dpl(), Dpl::Ring3);
        assert!(back.is_present());
    }

    #[test]
    #[should_panic(expected = "segment limit exceeds 20 bits")]
    fn oversized_limit_is_rejected() {
        let _ = encode_entry(0, 0x10_0000, 0xC, 0x9A);
    }

    #[test]
    #[should_panic(expected = "granularity is a 4-bit field")]
    fn oversized_granularity_is_rejected() {
        let _ = encode_entry(0, 0xF_FFFF, 0x1C, 0x9A);
    }
}
