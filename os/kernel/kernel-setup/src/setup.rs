//! # Boot sequence
//!
//! Builds the GDT, TSS and IDT into caller-owned storage and loads them:
//!
//! ```text
//! BootSequence::new(&mut tables)      Uninitialized
//!     .build(&handlers)               DescriptorsBuilt   (pure, testable)
//!     .install(&mut hw)               LoadedTables       (privileged)
//! ```
//!
//! `install` issues, in this order: PIC remap, `lgdt`, segment reload, `lidt`,
//! `ltr`. The storage must outlive every CPU that loaded it, which in practice
//! means a `static`.

use crate::addresses::LinearAddress;
use crate::gdt::{Gdt, KERNEL_CS_SEL, KERNEL_DS_SEL, TSS_SYS_SEL};
use crate::hardware::Hardware;
use crate::idt::{HandlerTable, Idt};
use crate::pic;
use crate::pointer::TablePointer;
use crate::tss::Tss32;
use core::marker::PhantomData;
use log::{debug, info};

/// Backing storage for every structure the CPU reads after boot.
#[repr(C)]
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DescriptorTables {
    gdt: Gdt,
    idt: Idt,
    tss: Tss32,
    gdt_pointer: TablePointer,
    idt_pointer: TablePointer,
}

impl Default for DescriptorTables {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorTables {
    /// All-zero storage, suitable for a `static`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gdt: Gdt::new(),
            idt: Idt::new(),
            tss: Tss32::new(),
            gdt_pointer: TablePointer::EMPTY,
            idt_pointer: TablePointer::EMPTY,
        }
    }

    /// Zero every table and both pointers.
    pub const fn clear(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub const fn gdt(&self) -> &Gdt {
        &self.gdt
    }

    #[must_use]
    pub const fn idt(&self) -> &Idt {
        &self.idt
    }

    #[must_use]
    pub const fn tss(&self) -> &Tss32 {
        &self.tss
    }

    #[must_use]
    pub const fn gdt_pointer(&self) -> &TablePointer {
        &self.gdt_pointer
    }

    #[must_use]
    pub const fn idt_pointer(&self) -> &TablePointer {
        &self.idt_pointer
    }

    fn populate(&mut self, handlers: &HandlerTable) {
        self.clear();
        let tss_base = self.tss.base();
        self.gdt.populate(tss_base);
        self.tss.populate();
        self.idt.populate(handlers);
        self.gdt_pointer = self.gdt.pointer();
        self.idt_pointer = self.idt.pointer();
    }
}

/// Storage handed over, nothing written yet.
pub enum Uninitialized {}

/// Tables and pointers are populated in memory but not loaded.
pub enum DescriptorsBuilt {}

/// Type-state driver for the descriptor-table bring-up.
pub struct BootSequence<'t, S> {
    tables: &'t mut DescriptorTables,
    _state: PhantomData<S>,
}

impl<'t> BootSequence<'t, Uninitialized> {
    pub const fn new(tables: &'t mut DescriptorTables) -> Self {
        Self {
            tables,
            _state: PhantomData,
        }
    }

    /// Populate GDT, TSS and IDT, then compute both table pointers.
    ///
    /// Previous contents of the storage are discarded, so building twice
    /// yields identical bytes.
    #[must_use]
    pub fn build(self, handlers: &HandlerTable) -> BootSequence<'t, DescriptorsBuilt> {
        self.tables.populate(handlers);
        BootSequence {
            tables: self.tables,
            _state: PhantomData,
        }
    }
}

impl<'t> BootSequence<'t, DescriptorsBuilt> {
    /// Inspect the built tables before they are loaded.
    #[must_use]
    pub const fn tables(&self) -> &DescriptorTables {
        self.tables
    }

    /// Program the PIC and load GDTR, segments, IDTR and TR.
    ///
    /// # Safety
    /// - Interrupts must be disabled.
    /// - The storage must stay at its address for as long as the CPU uses it.
    /// - Every handler address must point at a valid interrupt entry stub.
    pub unsafe fn install<H: Hardware + ?Sized>(self, hw: &mut H) -> LoadedTables<'t> {
        let tables: &'t DescriptorTables = self.tables;

        unsafe {
            pic::remap(hw);

            hw.load_gdt(&tables.gdt_pointer);
            info!("gdt at {:x}", tables.gdt_pointer.base());
            info!(
                "gdt pointer at {:x}",
                LinearAddress::from_ptr(&raw const tables.gdt_pointer)
            );

            hw.reload_segments(KERNEL_CS_SEL, KERNEL_DS_SEL);
            debug!("segments reloaded: cs={KERNEL_CS_SEL:?} ds={KERNEL_DS_SEL:?}");

            hw.load_idt(&tables.idt_pointer);
            info!("idt at {:x}", tables.idt_pointer.base());
            info!(
                "idt pointer at {:x}",
                LinearAddress::from_ptr(&raw const tables.idt_pointer)
            );

            hw.load_task_register(TSS_SYS_SEL);
            debug!(
                "tss at {:x} loaded with selector {TSS_SYS_SEL:?}",
                tables.tss.base()
            );
        }

        LoadedTables { tables }
    }
}

/// Read-only view of tables the CPU has loaded.
#[derive(Copy, Clone, Debug)]
pub struct LoadedTables<'t> {
    tables: &'t DescriptorTables,
}

impl<'t> LoadedTables<'t> {
    #[must_use]
    pub const fn tables(&self) -> &'t DescriptorTables {
        self.tables
    }
}

impl core::ops::Deref for LoadedTables<'_> {
    type Target = DescriptorTables;

    fn deref(&self) -> &Self::Target {
        self.tables
    }
}

/// Build and load everything in one go.
///
/// # Safety
/// See [`BootSequence::install`].
pub unsafe fn setup<'t, H: Hardware + ?Sized>(
    tables: &'t mut DescriptorTables,
    handlers: &HandlerTable,
    hw: &mut H,
) -> LoadedTables<'t> {
    let built = BootSequence::new(tables).build(handlers);
    unsafe { built.install(hw) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdt::TSS_LIMIT;

    fn handlers() -> HandlerTable {
        HandlerTable {
            exceptions: [LinearAddress::new(0x0010_0000); 17],
            generic: LinearAddress::new(0x0010_1000),
            irqs: [LinearAddress::new(0x0010_2000); 16],
            syscall: LinearAddress::new(0x0010_3000),
        }
    }

    #[test]
    fn build_links_tss_into_gdt() {
        let mut tables = DescriptorTables::new();
        let built = BootSequence::new(&mut tables).build(&handlers());
        let tables = built.tables();

        let tss_entry = tables.gdt()[5];
        assert_eq!(tss_entry.base(), tables.tss().base());
        assert_eq!(tss_entry.limit(), TSS_LIMIT);
        assert_eq!(tables.tss().ss0, 0x10);
    }

    #[test]
    fn pointers_match_table_addresses() {
        let mut tables = DescriptorTables::new();
        let built = BootSequence::new(&mut tables).build(&handlers());
        let tables = built.tables();

        let gdt = LinearAddress::from_ptr(tables.gdt());
        let idt = LinearAddress::from_ptr(tables.idt());
        assert_eq!(tables.gdt_pointer().base(), gdt);
        assert_eq!(tables.gdt_pointer().limit(), 47);
        assert_eq!(tables.idt_pointer().base(), idt);
        assert_eq!(tables.idt_pointer().limit(), 2047);
    }

    #[test]
    fn clear_resets_to_zero() {
        let mut tables = DescriptorTables::new();
        let _ = BootSequence::new(&mut tables).build(&handlers());
        assert_ne!(tables, DescriptorTables::new());
        tables.clear();
        assert_eq!(tables, DescriptorTables::new());
    }
}
