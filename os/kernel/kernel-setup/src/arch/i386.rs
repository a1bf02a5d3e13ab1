//! # i386 backend
//!
//! [`I386`] issues the real instructions behind [`crate::hardware`]. The
//! interrupt entry stubs are assembly symbols provided by the kernel image;
//! [`entry_points`] collects their addresses into a [`HandlerTable`].

use crate::addresses::LinearAddress;
use crate::gdt::selectors::{CodeSel, DataSel, SegmentSelector, TssSel};
use crate::hardware::{DescriptorRegisters, PortIo};
use crate::idt::HandlerTable;
use crate::pointer::TablePointer;
use crate::setup::{DescriptorTables, LoadedTables, setup};
use core::arch::asm;
use kernel_qemu::QemuLogger;
use log::LevelFilter;

/// The CPU this code is running on.
#[derive(Debug, Default)]
pub struct I386;

impl PortIo for I386 {
    unsafe fn write_port(&mut self, port: u16, value: u8) {
        unsafe {
            asm!(
                "out dx, al",
                in("dx") port,
                in("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }
}

impl DescriptorRegisters for I386 {
    unsafe fn load_gdt(&mut self, pointer: &TablePointer) {
        unsafe {
            asm!(
                "lgdt [{}]",
                in(reg) core::ptr::from_ref(pointer),
                options(readonly, nostack, preserves_flags)
            );
        }
    }

    unsafe fn reload_segments(
        &mut self,
        code: SegmentSelector<CodeSel>,
        data: SegmentSelector<DataSel>,
    ) {
        unsafe {
            asm!(
                "mov ds, {0:x}",
                "mov es, {0:x}",
                "mov fs, {0:x}",
                "mov gs, {0:x}",
                "mov ss, {0:x}",
                in(reg) data.encode(),
                options(nostack, preserves_flags)
            );

            // CS can only change through a far transfer.
            asm!(
                "push {cs}",
                "lea {tmp}, [2f]",
                "push {tmp}",
                "retf",
                "2:",
                cs = in(reg) u32::from(code.encode()),
                tmp = out(reg) _,
                options(preserves_flags)
            );
        }
    }

    unsafe fn load_idt(&mut self, pointer: &TablePointer) {
        unsafe {
            asm!(
                "lidt [{}]",
                in(reg) core::ptr::from_ref(pointer),
                options(readonly, nostack, preserves_flags)
            );
        }
    }

    unsafe fn load_task_register(&mut self, selector: SegmentSelector<TssSel>) {
        unsafe {
            asm!(
                "ltr {0:x}",
                in(reg) selector.encode(),
                options(nostack, preserves_flags)
            );
        }
    }
}

unsafe extern "C" {
    fn swint0();
    fn swint1();
    fn swint2();
    fn swint3();
    fn swint4();
    fn swint5();
    fn swint6();
    fn swint7();
    fn swint8();
    fn swint9();
    fn swint10();
    fn swint11();
    fn swint12();
    fn swint13();
    fn swint14();
    fn swint15();
    fn swint16();
    fn swint17();
    fn hwint0();
    fn hwint1();
    fn hwint2();
    fn hwint3();
    fn hwint4();
    fn hwint5();
    fn hwint6();
    fn hwint7();
    fn hwint8();
    fn hwint9();
    fn hwint10();
    fn hwint11();
    fn hwint12();
    fn hwint13();
    fn hwint14();
    fn hwint15();
    fn syscall();
}

/// Addresses of the kernel's interrupt entry stubs.
#[must_use]
pub fn entry_points() -> HandlerTable {
    let exceptions: [unsafe extern "C" fn(); 17] = [
        swint0, swint1, swint2, swint3, swint4, swint5, swint6, swint7, swint8, swint9, swint10,
        swint11, swint12, swint13, swint14, swint15, swint16,
    ];
    let irqs: [unsafe extern "C" fn(); 16] = [
        hwint0, hwint1, hwint2, hwint3, hwint4, hwint5, hwint6, hwint7, hwint8, hwint9, hwint10,
        hwint11, hwint12, hwint13, hwint14, hwint15,
    ];

    HandlerTable {
        exceptions: exceptions.map(LinearAddress::from_handler),
        generic: LinearAddress::from_handler(swint17),
        irqs: irqs.map(LinearAddress::from_handler),
        syscall: LinearAddress::from_handler(syscall),
    }
}

static mut TABLES: DescriptorTables = DescriptorTables::new();

static LOGGER: QemuLogger = QemuLogger::new(LevelFilter::Debug);

/// Build and load the boot CPU's descriptor tables from static storage.
///
/// Installs the debug-port logger unless the kernel already registered one.
///
/// # Safety
/// Call once, with interrupts disabled, before anything raises an interrupt.
pub unsafe fn init() -> LoadedTables<'static> {
    // An already installed logger keeps receiving the diagnostics.
    let _ = LOGGER.install();
    let handlers = entry_points();

    #[allow(static_mut_refs)]
    unsafe {
        setup(&mut TABLES, &handlers, &mut I386)
    }
}
