//! # 8259 Programmable Interrupt Controller wiring
//!
//! Two controllers in the classic PC/AT cascade: the slave hangs off the
//! master's IRQ 2 line.

/// Command port of the master controller.
pub const MASTER_COMMAND: u16 = 0x20;

/// Data port of the master controller.
pub const MASTER_DATA: u16 = 0x21;

/// Command port of the slave controller.
pub const SLAVE_COMMAND: u16 = 0xA0;

/// Data port of the slave controller.
pub const SLAVE_DATA: u16 = 0xA1;

/// ICW1: edge triggered, cascade mode, ICW4 follows.
pub const ICW1_INIT: u8 = 0x11;

/// ICW2 for the master: vector of IRQ 0.
pub const MASTER_OFFSET: u8 = 0x20;

/// ICW2 for the slave: vector of IRQ 8.
pub const SLAVE_OFFSET: u8 = 0x28;

/// ICW3 for the master: bit mask of the line the slave is attached to (IRQ 2).
pub const MASTER_CASCADE: u8 = 0x04;

/// ICW3 for the slave: its cascade identity (line number 2).
pub const SLAVE_CASCADE: u8 = 0x02;

/// ICW4: 8086/88 mode.
pub const ICW4_8086: u8 = 0x01;

/// OCW1: interrupt mask with every line enabled.
pub const UNMASK_ALL: u8 = 0x00;

const _: () = {
    assert!(MASTER_CASCADE == 1 << SLAVE_CASCADE);
    assert!(MASTER_OFFSET.is_multiple_of(8));
    assert!(SLAVE_OFFSET.is_multiple_of(8));
};
