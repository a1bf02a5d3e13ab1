//! # Global Descriptor Table (GDT)
//!
//! The kernel runs with a flat memory model: every code/data segment spans
//! the full 4 GiB, so segmentation only carries **privilege** (DPL) and the
//! **code vs. data** distinction. The one non-flat entry is the TSS system
//! descriptor, which the CPU needs to find `ss0:esp0` on a ring 3 → ring 0
//! transition.
//!
//! ## Layout
//! Index | Selector | Meaning
//! ------|----------|--------
//! 0     | 0x00     | Null
//! 1     | 0x08     | Kernel code (DPL=0; [`KERNEL_CS_SEL`])
//! 2     | 0x10     | Kernel data (DPL=0; [`KERNEL_DS_SEL`])
//! 3     | 0x18     | User code (DPL=3) → with RPL=3: **0x1b** ([`USER_CS_SEL`])
//! 4     | 0x20     | User data (DPL=3) → with RPL=3: **0x23** ([`USER_DS_SEL`])
//! 5     | 0x28     | Available 32-bit TSS ([`TSS_SYS_SEL`])
//!
//! Building the table is pure; loading it (`lgdt` plus the segment reload)
//! goes through [`crate::hardware::DescriptorRegisters`].

pub mod descriptors;
pub mod selectors;

use crate::addresses::LinearAddress;
use crate::gdt::descriptors::{AccessByte, SegmentDescriptor};
use crate::gdt::selectors::{CodeSel, DataSel, SegmentSelector, TssSel};
use crate::pointer::TablePointer;
use crate::privilege::{Dpl, Ring, Rpl};
use core::ops::Index;
use kernel_info::layout::{
    GDT_ENTRIES, GDT_ENTRY_SIZE, GDT_KERNEL_CODE, GDT_KERNEL_DATA, GDT_NULL, GDT_TSS, GDT_USER_CODE,
    GDT_USER_DATA, TSS_SIZE,
};

pub const KERNEL_CS_SEL: SegmentSelector<CodeSel> =
    SegmentSelector::<CodeSel>::new(GDT_KERNEL_CODE, Rpl::Ring0);
pub const KERNEL_DS_SEL: SegmentSelector<DataSel> =
    SegmentSelector::<DataSel>::new(GDT_KERNEL_DATA, Rpl::Ring0);
pub const USER_CS_SEL: SegmentSelector<CodeSel> =
    SegmentSelector::<CodeSel>::new(GDT_USER_CODE, Rpl::Ring3);
pub const USER_DS_SEL: SegmentSelector<DataSel> =
    SegmentSelector::<DataSel>::new(GDT_USER_DATA, Rpl::Ring3);
pub const TSS_SYS_SEL: SegmentSelector<TssSel> = SegmentSelector::<TssSel>::new(GDT_TSS);

// Encoded selector numbers as `u16` (what the CPU actually loads).
pub const KERNEL_CS: u16 = KERNEL_CS_SEL.encode(); // 0x08
pub const KERNEL_DS: u16 = KERNEL_DS_SEL.encode(); // 0x10
pub const USER_CS: u16 = USER_CS_SEL.encode(); // 0x1b
pub const USER_DS: u16 = USER_DS_SEL.encode(); // 0x23
pub const TSS_SEL: u16 = TSS_SYS_SEL.encode(); // 0x28

#[allow(clippy::items_after_statements)]
const _: () = {
    assert!(KERNEL_CS == 0x08);
    assert!(KERNEL_DS == 0x10);
    assert!(USER_CS == 0x1b);
    assert!(USER_DS == 0x23);
    assert!(TSS_SEL == 0x28);

    // Encoding formula: (index << 3) | (TI=0) | RPL
    const fn enc(index: u16, rpl: u16) -> u16 {
        (index << 3) | rpl
    }

    assert!(KERNEL_CS == enc(GDT_KERNEL_CODE, 0));
    assert!(KERNEL_DS == enc(GDT_KERNEL_DATA, 0));
    assert!(USER_CS == enc(GDT_USER_CODE, 3));
    assert!(USER_DS == enc(GDT_USER_DATA, 3));
    assert!(TSS_SEL == enc(GDT_TSS, 0));
};

/// Limit of the TSS system descriptor (byte granular, inclusive).
#[allow(clippy::cast_possible_truncation)]
pub const TSS_LIMIT: u32 = (TSS_SIZE - 1) as u32;

/// The complete GDT of the boot CPU.
#[repr(C, align(8))]
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Gdt {
    entries: [SegmentDescriptor; GDT_ENTRIES],
}

impl Default for Gdt {
    fn default() -> Self {
        Self::new()
    }
}

impl Gdt {
    /// A table of null descriptors.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [SegmentDescriptor::NULL; GDT_ENTRIES],
        }
    }

    /// Build the six fixed descriptors, the TSS one pointing at `tss_base`.
    #[must_use]
    pub const fn build(tss_base: LinearAddress) -> Self {
        let mut gdt = Self::new();
        gdt.populate(tss_base);
        gdt
    }

    /// Overwrite every entry with the fixed layout.
    pub const fn populate(&mut self, tss_base: LinearAddress) {
        let kernel_code = SegmentDescriptor::flat(AccessByte::code(Dpl::Ring0));
        let kernel_data = SegmentDescriptor::flat(AccessByte::data(Dpl::Ring0));
        let user_code = SegmentDescriptor::flat(AccessByte::code(Dpl::Ring3));
        let user_data = SegmentDescriptor::flat(AccessByte::data(Dpl::Ring3));

        self.set(GDT_NULL, SegmentDescriptor::NULL);
        self.set(GDT_KERNEL_CODE, kernel_code);
        self.set(GDT_KERNEL_DATA, kernel_data);
        self.set(GDT_USER_CODE, user_code);
        self.set(GDT_USER_DATA, user_data);
        self.set(GDT_TSS, SegmentDescriptor::tss(tss_base, TSS_LIMIT));
    }

    /// # Panics
    /// If `index` is outside the table.
    pub const fn set(&mut self, index: u16, descriptor: SegmentDescriptor) {
        assert!((index as usize) < GDT_ENTRIES, "GDT index out of range");
        self.entries[index as usize] = descriptor;
    }

    /// # Panics
    /// If `index` is outside the table.
    #[must_use]
    pub const fn entry(&self, index: u16) -> SegmentDescriptor {
        assert!((index as usize) < GDT_ENTRIES, "GDT index out of range");
        self.entries[index as usize]
    }

    #[must_use]
    pub const fn entries(&self) -> &[SegmentDescriptor; GDT_ENTRIES] {
        &self.entries
    }

    /// `lgdt` operand for this table at its current address.
    #[must_use]
    pub fn pointer(&self) -> TablePointer {
        TablePointer::for_table(self)
    }

    /// The table as the CPU sees it.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; GDT_ENTRIES * GDT_ENTRY_SIZE] {
        let mut bytes = [0u8; GDT_ENTRIES * GDT_ENTRY_SIZE];
        for (chunk, entry) in bytes.chunks_exact_mut(GDT_ENTRY_SIZE).zip(&self.entries) {
            chunk.copy_from_slice(&entry.to_bytes());
        }
        bytes
    }
}

impl Index<u16> for Gdt {
    type Output = SegmentDescriptor;

    fn index(&self, index: u16) -> &Self::Output {
        assert!((index as usize) < GDT_ENTRIES, "GDT index out of range");
        &self.entries[index as usize]
    }
}

const _: () = assert!(size_of::<Gdt>() == GDT_ENTRIES * GDT_ENTRY_SIZE);

// Ring 3 may load the user data segment but never the kernel one.
const _: () = {
    let user = AccessByte::data(Dpl::Ring3).dpl();
    let kernel = AccessByte::data(Dpl::Ring0).dpl();
    assert!(user.permits_data_load(Ring::Ring3, USER_DS_SEL.rpl()));
    assert!(kernel.permits_data_load(Ring::Ring0, KERNEL_DS_SEL.rpl()));
    assert!(!kernel.permits_data_load(Ring::Ring3, Rpl::Ring3));
    assert!(!kernel.permits_data_load(Ring::Ring0, Rpl::Ring3));
};
