//! # 8259 PIC remapping
//!
//! Out of reset both controllers deliver IRQs on vectors that collide with CPU
//! exceptions. Four initialization command words per controller move them to
//! [`MASTER_OFFSET`]/[`SLAVE_OFFSET`], wire the cascade on IRQ 2, select 8086
//! mode, and finally write the interrupt masks.

use crate::hardware::PortIo;
use kernel_info::pic::{
    ICW1_INIT, ICW4_8086, MASTER_CASCADE, MASTER_COMMAND, MASTER_DATA, MASTER_OFFSET, SLAVE_CASCADE,
    SLAVE_COMMAND, SLAVE_DATA, SLAVE_OFFSET, UNMASK_ALL,
};
use log::debug;

/// `(port, value)` pairs written by [`remap`], in order.
pub const INIT_SEQUENCE: [(u16, u8); 10] = [
    // ICW1: edge triggered, cascade, ICW4 follows
    (MASTER_COMMAND, ICW1_INIT),
    (SLAVE_COMMAND, ICW1_INIT),
    // ICW2: vector offsets
    (MASTER_DATA, MASTER_OFFSET),
    (SLAVE_DATA, SLAVE_OFFSET),
    // ICW3: slave on master IRQ 2
    (MASTER_DATA, MASTER_CASCADE),
    (SLAVE_DATA, SLAVE_CASCADE),
    // ICW4
    (MASTER_DATA, ICW4_8086),
    (SLAVE_DATA, ICW4_8086),
    // OCW1: masks
    (MASTER_DATA, UNMASK_ALL),
    (SLAVE_DATA, UNMASK_ALL),
];

/// Reprogram both PICs.
///
/// Lines end up unmasked at the controllers; nothing is delivered until the
/// caller sets `IF`.
///
/// # Safety
/// Must run with interrupts disabled and before the IDT routes IRQ vectors.
pub unsafe fn remap<P: PortIo + ?Sized>(io: &mut P) {
    debug!("remapping PIC to vectors {MASTER_OFFSET:#x} and {SLAVE_OFFSET:#x}");
    for (port, value) in INIT_SEQUENCE {
        unsafe { io.write_port(port, value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ports(Vec<(u16, u8)>);

    impl PortIo for Ports {
        unsafe fn write_port(&mut self, port: u16, value: u8) {
            self.0.push((port, value));
        }
    }

    #[test]
    fn writes_ten_bytes_in_order() {
        let mut ports = Ports::default();
        unsafe { remap(&mut ports) };
        assert_eq!(
            ports.0,
            [
                (0x20, 0x11),
                (0xA0, 0x11),
                (0x21, 0x20),
                (0xA1, 0x28),
                (0x21, 0x04),
                (0xA1, 0x02),
                (0x21, 0x01),
                (0xA1, 0x01),
                (0x21, 0x00),
                (0xA1, 0x00),
            ]
        );
    }
}
