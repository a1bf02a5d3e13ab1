//! # Hardware boundary
//!
//! Every privileged instruction the boot sequence issues goes through these
//! traits. The kernel uses [`crate::arch::i386::I386`]; tests substitute a
//! recorder and inspect the call sequence.

use crate::gdt::selectors::{CodeSel, DataSel, SegmentSelector, TssSel};
use crate::pointer::TablePointer;

/// Byte-wide port output (`out dx, al`).
pub trait PortIo {
    /// # Safety
    /// Writing to an I/O port can reconfigure arbitrary devices.
    unsafe fn write_port(&mut self, port: u16, value: u8);
}

/// The descriptor-table registers and the segment registers that cache them.
pub trait DescriptorRegisters {
    /// `lgdt`.
    ///
    /// # Safety
    /// `pointer` must describe a valid GDT that stays resident for as long as
    /// the CPU may consult it.
    unsafe fn load_gdt(&mut self, pointer: &TablePointer);

    /// Far-reload `CS` and load `DS`, `ES`, `FS`, `GS`, `SS`.
    ///
    /// # Safety
    /// Both selectors must reference present descriptors in the loaded GDT.
    unsafe fn reload_segments(
        &mut self,
        code: SegmentSelector<CodeSel>,
        data: SegmentSelector<DataSel>,
    );

    /// `lidt`.
    ///
    /// # Safety
    /// `pointer` must describe a valid IDT that stays resident, and every
    /// present gate must point at a real handler.
    unsafe fn load_idt(&mut self, pointer: &TablePointer);

    /// `ltr`.
    ///
    /// # Safety
    /// `selector` must reference an available TSS descriptor in the loaded GDT.
    unsafe fn load_task_register(&mut self, selector: SegmentSelector<TssSel>);
}

/// Everything the boot sequence needs from the machine.
pub trait Hardware: PortIo + DescriptorRegisters {}

impl<T: PortIo + DescriptorRegisters + ?Sized> Hardware for T {}
