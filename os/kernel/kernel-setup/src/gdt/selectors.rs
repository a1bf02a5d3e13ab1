//! # Segment selectors of the i386 kernel
//!
//! Every selector this kernel loads names a GDT slot (TI is always 0):
//!
//! ```text
//!  15                3   2   1   0
//! +--------------------+---+-------+
//! |  GDT index (0..=5) | 0 |  RPL  |
//! +--------------------+---+-------+
//! ```
//!
//! | Register | Selector | Kind |
//! |----------|----------|------|
//! | `CS` (kernel / user) | `0x08` / `0x1b` | [`CodeSel`] |
//! | `DS ES FS GS SS` (kernel / user) | `0x10` / `0x23` | [`DataSel`] |
//! | `TR` | `0x28` | [`TssSel`] |
//!
//! The kind parameter decides which register a selector may reach: the
//! segment reload only takes a code selector for `CS`, and `ltr` only
//! takes a TSS selector. User selectors carry RPL 3 so they can be placed
//! straight into an `iret` frame.

use crate::privilege::Rpl;
use bitfield_struct::bitfield;
use core::fmt;
use core::marker::PhantomData;

/// Table Indicator bit.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Table {
    Gdt = 0,
    /// Never used; the kernel installs no LDT.
    Ldt = 1,
}

impl Table {
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        if bits == 0 { Self::Gdt } else { Self::Ldt }
    }

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

/// The 16 bits a segment register holds.
#[bitfield(u16)]
#[derive(Eq, PartialEq)]
pub struct SegmentSelectorRaw {
    #[bits(2)]
    pub rpl: Rpl,
    #[bits(1)]
    pub ti: Table,
    /// Slot number in the descriptor table.
    #[bits(13)]
    pub index: u16,
}

impl SegmentSelectorRaw {
    /// Selector for GDT slot `index` requested at `rpl`.
    #[inline]
    #[must_use]
    pub const fn gdt(index: u16, rpl: Rpl) -> Self {
        Self::new()
            .with_index(index)
            .with_ti(Table::Gdt)
            .with_rpl(rpl)
    }
}

/// Restricts which register a [`SegmentSelector`] may be loaded into.
pub trait SelectorKind: Copy {}

/// Loadable into `CS` (far jump, far return, `iret`).
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum CodeSel {}

/// Loadable into `DS`, `ES`, `FS`, `GS` and `SS`.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum DataSel {}

/// Loadable into `TR` via `ltr`.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum TssSel {}

impl SelectorKind for CodeSel {}
impl SelectorKind for DataSel {}
impl SelectorKind for TssSel {}

/// A GDT selector tagged with the register kind it is meant for.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct SegmentSelector<K: SelectorKind>(SegmentSelectorRaw, PhantomData<K>);

impl<K: SelectorKind> SegmentSelector<K> {
    const fn from_raw(raw: SegmentSelectorRaw) -> Self {
        Self(raw, PhantomData)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> SegmentSelectorRaw {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0.index()
    }

    #[inline]
    #[must_use]
    pub const fn rpl(self) -> Rpl {
        self.0.rpl()
    }

    /// The value written into the segment register.
    #[inline]
    #[must_use]
    pub const fn encode(self) -> u16 {
        self.0.into_bits()
    }
}

impl SegmentSelector<CodeSel> {
    #[inline]
    #[must_use]
    pub const fn new(index: u16, rpl: Rpl) -> Self {
        Self::from_raw(SegmentSelectorRaw::gdt(index, rpl))
    }
}

impl SegmentSelector<DataSel> {
    #[inline]
    #[must_use]
    pub const fn new(index: u16, rpl: Rpl) -> Self {
        Self::from_raw(SegmentSelectorRaw::gdt(index, rpl))
    }
}

impl SegmentSelector<TssSel> {
    /// `ltr` ignores the RPL, so it stays 0.
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self::from_raw(SegmentSelectorRaw::gdt(index, Rpl::Ring0))
    }
}

impl<K: SelectorKind> fmt::Debug for SegmentSelector<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_index_table_and_rpl() {
        let user_code = SegmentSelector::<CodeSel>::new(3, Rpl::Ring3);
        assert_eq!(user_code.encode(), 0x1b);
        assert_eq!(user_code.index(), 3);
        assert_eq!(user_code.rpl(), Rpl::Ring3);
        assert_eq!(user_code.raw().ti(), Table::Gdt);
    }

    #[test]
    fn user_data_selector_carries_rpl3() {
        let user_data = SegmentSelector::<DataSel>::new(4, Rpl::Ring3);
        assert_eq!(user_data.encode(), 0x23);
    }

    #[test]
    fn tss_selector_is_ring0() {
        let tss = SegmentSelector::<TssSel>::new(5);
        assert_eq!(tss.encode(), 0x28);
        assert_eq!(format!("{tss:?}"), "0x0028");
    }
}
