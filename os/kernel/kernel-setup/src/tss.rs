//! # 32-bit Task State Segment (TSS)
//!
//! The kernel never uses hardware task switching, but the CPU still reads
//! the TSS on every interrupt that raises the privilege level: it switches to
//! `ss0:esp0` before pushing the interrupted ring-3 context. The scheduler
//! owns `esp0`; this module only establishes the structure:
//!
//! - `ss0` is the kernel data selector ([`crate::gdt::KERNEL_DS`]).
//! - The I/O map base points at the last byte of the TSS, past which no
//!   bitmap exists, so every `in`/`out` from ring 3 faults.
//!
//! The TSS is referenced by GDT index 5 and loaded with `ltr`.

use crate::addresses::LinearAddress;
use crate::gdt::KERNEL_DS;
use bitfield_struct::bitfield;
use kernel_info::layout::TSS_SIZE;

/// I/O map base that places the bitmap beyond the TSS limit.
#[allow(clippy::cast_possible_truncation)]
pub const IOMAP_BASE: u16 = (TSS_SIZE - 1) as u16;

/// Last dword of the TSS: debug-trap flag and I/O map base.
#[bitfield(u32)]
#[derive(Eq, PartialEq)]
pub struct TrapIomap {
    /// Raise a debug exception on task switch into this task.
    pub debug_trap: bool,
    #[bits(15)]
    __: u16,
    /// Offset of the I/O permission bitmap from the TSS base.
    pub iomap_base: u16,
}

/// The 104-byte i386 TSS.
///
/// Every register slot is a full dword; selector slots keep their upper
/// halves zero.
#[repr(C)]
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Tss32 {
    /// Selector of the previous task (hardware task linking; unused).
    pub link: u32,
    /// Ring-0 stack pointer loaded on privilege elevation.
    pub esp0: u32,
    /// Ring-0 stack segment loaded on privilege elevation.
    pub ss0: u32,
    pub esp1: u32,
    pub ss1: u32,
    pub esp2: u32,
    pub ss2: u32,
    pub cr3: u32,
    pub eip: u32,
    pub eflags: u32,
    pub eax: u32,
    pub ecx: u32,
    pub edx: u32,
    pub ebx: u32,
    pub esp: u32,
    pub ebp: u32,
    pub esi: u32,
    pub edi: u32,
    pub es: u32,
    pub cs: u32,
    pub ss: u32,
    pub ds: u32,
    pub fs: u32,
    pub gs: u32,
    pub ldt: u32,
    pub trap_iomap: TrapIomap,
}

impl Default for Tss32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Tss32 {
    /// An all-zero TSS.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            link: 0,
            esp0: 0,
            ss0: 0,
            esp1: 0,
            ss1: 0,
            esp2: 0,
            ss2: 0,
            cr3: 0,
            eip: 0,
            eflags: 0,
            eax: 0,
            ecx: 0,
            edx: 0,
            ebx: 0,
            esp: 0,
            ebp: 0,
            esi: 0,
            edi: 0,
            es: 0,
            cs: 0,
            ss: 0,
            ds: 0,
            fs: 0,
            gs: 0,
            ldt: 0,
            trap_iomap: TrapIomap::new(),
        }
    }

    /// Zero-fill, then set the ring-0 stack segment and deny user port I/O.
    pub const fn populate(&mut self) {
        *self = Self::new();
        self.ss0 = KERNEL_DS as u32;
        self.trap_iomap = TrapIomap::new().with_iomap_base(IOMAP_BASE);
    }

    #[must_use]
    pub const fn build() -> Self {
        let mut tss = Self::new();
        tss.populate();
        tss
    }

    /// Linear address the GDT's TSS descriptor must carry.
    #[must_use]
    pub fn base(&self) -> LinearAddress {
        LinearAddress::from_ptr(self)
    }
}

const _: () = {
    assert!(size_of::<TrapIomap>() == 4);
    assert!(size_of::<Tss32>() == TSS_SIZE);
    assert!(core::mem::offset_of!(Tss32, ss0) == 8);
    assert!(core::mem::offset_of!(Tss32, trap_iomap) == TSS_SIZE - 4);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring0_stack_segment_is_kernel_data() {
        let tss = Tss32::build();
        assert_eq!(tss.ss0, 0x10);
        assert_eq!(tss.esp0, 0);
    }

    #[test]
    fn iomap_dword_points_past_the_structure() {
        let tss = Tss32::build();
        assert_eq!(tss.trap_iomap.into_bits(), ((TSS_SIZE - 1) << 16) as u32);
        assert_eq!(tss.trap_iomap.iomap_base(), 103);
        assert!(!tss.trap_iomap.debug_trap());
    }

    #[test]
    fn populate_clears_stale_state() {
        let mut tss = Tss32::new();
        tss.eax = 0xDEAD_BEEF;
        tss.esp0 = 0x9000;
        tss.populate();
        assert_eq!(tss, Tss32::build());
    }
}
