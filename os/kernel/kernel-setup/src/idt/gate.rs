//! # 32-bit gate descriptor codec
//!
//! ```text
//!  63            48 47 46 45 44 43  40 39     32 31            16 15            0
//! +----------------+--+-----+--+------+---------+----------------+---------------+
//! | offset[31:16]  |P | DPL |S | type |  zero   |    selector    | offset[15:0]  |
//! +----------------+--+-----+--+------+---------+----------------+---------------+
//! ```
//!
//! The upper nibble of byte 5 (`P|DPL|S`) is what the boot code calls the gate
//! *flags*: `0x8` for kernel-only gates, `0xE` for gates ring 3 may `int` into.

use crate::addresses::LinearAddress;
use crate::privilege::Dpl;
use bitfield_struct::bitfield;
use kernel_info::layout::IDT_ENTRY_SIZE;

/// Gate kinds that may appear in a 32-bit IDT.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum GateType {
    Task32 = 0x5,
    Interrupt16 = 0x6,
    Trap16 = 0x7,
    /// Clears `IF` on entry.
    Interrupt32 = 0xE,
    /// Leaves `IF` unchanged.
    Trap32 = 0xF,
}

impl GateType {
    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GateType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x5 => Ok(Self::Task32),
            0x6 => Ok(Self::Interrupt16),
            0x7 => Ok(Self::Trap16),
            0xE => Ok(Self::Interrupt32),
            0xF => Ok(Self::Trap32),
            other => Err(DecodeError::UnknownGateType(other)),
        }
    }
}

/// Error returned when reading back an encoded gate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown gate type {0:#x}")]
    UnknownGateType(u8),
}

/// The flags nibble: `P | DPL(2) | S`.
#[bitfield(u8)]
#[derive(Eq, PartialEq)]
pub struct GateFlags {
    /// Must be `false` for gates.
    pub s: bool,
    #[bits(2)]
    pub dpl: Dpl,
    pub present: bool,
    #[bits(4)]
    __: u8,
}

impl GateFlags {
    /// Present gate with the given DPL.
    #[inline]
    #[must_use]
    pub const fn present_with(dpl: Dpl) -> Self {
        Self::new().with_dpl(dpl).with_present(true)
    }
}

/// Bit view of one 8-byte gate descriptor.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct GateDescriptorBits {
    /// Handler offset, bits 0..16.
    pub offset_lo: u16,
    /// Code segment the handler runs in.
    pub selector: u16,
    /// Must be zero for interrupt and trap gates.
    #[bits(8)]
    __: u8,
    /// [`GateType`] nibble.
    #[bits(4)]
    pub typ: u8,
    #[bits(4)]
    pub flags: GateFlags,
    /// Handler offset, bits 16..32.
    pub offset_hi: u16,
}

/// A single 8-byte IDT entry.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct GateDescriptor(GateDescriptorBits);

impl GateDescriptor {
    /// A zeroed, non-present entry.
    pub const MISSING: Self = Self(GateDescriptorBits::new());

    /// Present gate routing to `handler` in segment `selector`.
    #[inline]
    #[must_use]
    pub const fn new(handler: LinearAddress, selector: u16, typ: GateType, dpl: Dpl) -> Self {
        let flags = GateFlags::present_with(dpl);
        Self::from_parts(handler, selector, typ.into_bits(), flags)
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn from_parts(handler: LinearAddress, selector: u16, typ: u8, flags: GateFlags) -> Self {
        let handler = handler.as_u32();
        let bits = GateDescriptorBits::new()
            .with_offset_lo((handler & 0xFFFF) as u16)
            .with_selector(selector)
            .with_typ(typ)
            .with_flags(flags)
            .with_offset_hi((handler >> 16) as u16);
        Self(bits)
    }

    #[inline]
    #[must_use]
    pub const fn handler(self) -> LinearAddress {
        let lo = self.0.offset_lo() as u32;
        let hi = self.0.offset_hi() as u32;
        LinearAddress::new(lo | (hi << 16))
    }

    #[inline]
    #[must_use]
    pub const fn selector(self) -> u16 {
        self.0.selector()
    }

    /// # Errors
    /// If the type nibble is not a valid 32-bit IDT gate type.
    #[inline]
    pub fn gate_type(self) -> Result<GateType, DecodeError> {
        GateType::try_from(self.0.typ())
    }

    #[inline]
    #[must_use]
    pub const fn flags(self) -> GateFlags {
        self.0.flags()
    }

    #[inline]
    #[must_use]
    pub const fn dpl(self) -> Dpl {
        self.0.flags().dpl()
    }

    #[inline]
    #[must_use]
    pub const fn is_present(self) -> bool {
        self.0.flags().present()
    }

    #[inline]
    #[must_use]
    pub const fn to_u64(self) -> u64 {
        self.0.into_bits()
    }

    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; IDT_ENTRY_SIZE] {
        self.0.into_bits().to_le_bytes()
    }

    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; IDT_ENTRY_SIZE]) -> Self {
        Self(GateDescriptorBits::from_bits(u64::from_le_bytes(bytes)))
    }
}

impl Default for GateDescriptor {
    fn default() -> Self {
        Self::MISSING
    }
}

/// Pack `(handler, selector, type, flags)` into a gate.
///
/// `gate_type` is the raw type nibble, `flags` the raw `P|DPL|S` nibble.
///
/// # Panics
/// If `gate_type` or `flags` exceed 4 bits.
#[must_use]
pub const fn encode_gate(handler: u32, selector: u16, gate_type: u8, flags: u8) -> GateDescriptor {
    assert!(gate_type <= 0xF, "gate type is a 4-bit field");
    assert!(flags <= 0xF, "gate flags are a 4-bit field");
    GateDescriptor::from_parts(
        LinearAddress::new(handler),
        selector,
        gate_type,
        GateFlags::from_bits(flags),
    )
}

const _: () = {
    assert!(size_of::<GateDescriptorBits>() == IDT_ENTRY_SIZE);
    assert!(size_of::<GateDescriptor>() == IDT_ENTRY_SIZE);
};
