#![allow(dead_code)]

use kernel_setup::addresses::LinearAddress;
use kernel_setup::gdt::selectors::{CodeSel, DataSel, SegmentSelector, TssSel};
use kernel_setup::hardware::{DescriptorRegisters, PortIo};
use kernel_setup::idt::HandlerTable;
use kernel_setup::pointer::TablePointer;

/// One privileged operation as seen by the hardware boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Port { port: u16, value: u8 },
    LoadGdt(TablePointer),
    ReloadSegments { code: u16, data: u16 },
    LoadIdt(TablePointer),
    LoadTaskRegister(u16),
}

/// Records every call instead of touching the CPU.
#[derive(Debug, Default)]
pub struct RecordingHardware {
    pub events: Vec<Event>,
}

impl RecordingHardware {
    pub fn port_writes(&self) -> Vec<(u16, u8)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Port { port, value } => Some((*port, *value)),
                _ => None,
            })
            .collect()
    }
}

impl PortIo for RecordingHardware {
    unsafe fn write_port(&mut self, port: u16, value: u8) {
        self.events.push(Event::Port { port, value });
    }
}

impl DescriptorRegisters for RecordingHardware {
    unsafe fn load_gdt(&mut self, pointer: &TablePointer) {
        self.events.push(Event::LoadGdt(*pointer));
    }

    unsafe fn reload_segments(
        &mut self,
        code: SegmentSelector<CodeSel>,
        data: SegmentSelector<DataSel>,
    ) {
        self.events.push(Event::ReloadSegments {
            code: code.encode(),
            data: data.encode(),
        });
    }

    unsafe fn load_idt(&mut self, pointer: &TablePointer) {
        self.events.push(Event::LoadIdt(*pointer));
    }

    unsafe fn load_task_register(&mut self, selector: SegmentSelector<TssSel>) {
        self.events.push(Event::LoadTaskRegister(selector.encode()));
    }
}

/// Distinct, recognizable fake handler addresses.
pub fn sample_handlers() -> HandlerTable {
    HandlerTable {
        exceptions: core::array::from_fn(|i| LinearAddress::new(0x0010_0000 + 0x20 * i as u32)),
        generic: LinearAddress::new(0x0010_0800),
        irqs: core::array::from_fn(|i| LinearAddress::new(0x0010_1000 + 0x20 * i as u32)),
        syscall: LinearAddress::new(0x0010_2000),
    }
}
