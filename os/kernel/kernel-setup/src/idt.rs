//! # Interrupt Descriptor Table (IDT)
//!
//! 256 gates, one per vector. Routing comes from [`Route::for_vector`], the
//! entry points from a caller-supplied [`HandlerTable`]; every present gate is
//! a 32-bit interrupt gate in the kernel code segment so `IF` is cleared on
//! entry. Vectors without a route keep a zero (non-present) entry and raise
//! `#NP` if ever triggered.

pub mod gate;
pub mod routes;

pub use gate::{DecodeError, GateDescriptor, GateFlags, GateType, encode_gate};
pub use routes::{HandlerTable, Route};

use crate::gdt::KERNEL_CS;
use crate::pointer::TablePointer;
use core::ops::Index;
use kernel_info::layout::{IDT_ENTRIES, IDT_ENTRY_SIZE};

#[repr(C, align(8))]
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Idt {
    entries: [GateDescriptor; IDT_ENTRIES],
}

impl Default for Idt {
    fn default() -> Self {
        Self::new()
    }
}

impl Idt {
    /// An IDT with every gate missing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [GateDescriptor::MISSING; IDT_ENTRIES],
        }
    }

    #[must_use]
    pub fn build(handlers: &HandlerTable) -> Self {
        let mut idt = Self::new();
        idt.populate(handlers);
        idt
    }

    /// Rewrite all 256 entries from the routing map.
    pub fn populate(&mut self, handlers: &HandlerTable) {
        for (vector, entry) in (0..=u8::MAX).zip(self.entries.iter_mut()) {
            let route = Route::for_vector(vector);
            let dpl = route.gate_dpl();
            let interrupt_gate =
                |handler| GateDescriptor::new(handler, KERNEL_CS, GateType::Interrupt32, dpl);
            let resolved = handlers.resolve(route);
            *entry = resolved.map_or(GateDescriptor::MISSING, interrupt_gate);
        }
    }

    #[inline]
    #[must_use]
    pub const fn entry(&self, vector: u8) -> GateDescriptor {
        self.entries[vector as usize]
    }

    #[must_use]
    pub const fn entries(&self) -> &[GateDescriptor; IDT_ENTRIES] {
        &self.entries
    }

    #[must_use]
    pub fn pointer(&self) -> TablePointer {
        TablePointer::for_table(self)
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; IDT_ENTRIES * IDT_ENTRY_SIZE] {
        let mut bytes = [0u8; IDT_ENTRIES * IDT_ENTRY_SIZE];
        for (chunk, entry) in bytes.chunks_exact_mut(IDT_ENTRY_SIZE).zip(&self.entries) {
            chunk.copy_from_slice(&entry.to_bytes());
        }
        bytes
    }
}

impl Index<usize> for Idt {
    type Output = GateDescriptor;

    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < IDT_ENTRIES, "IDT vector out of range");
        &self.entries[index]
    }
}

const _: () = assert!(size_of::<Idt>() == IDT_ENTRIES * IDT_ENTRY_SIZE);
