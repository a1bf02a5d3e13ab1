//! # Interrupt Vector Map

use crate::pic::{MASTER_OFFSET, SLAVE_OFFSET};

/// Number of CPU exceptions that get a dedicated handler (vectors `0..=16`).
pub const DEDICATED_EXCEPTIONS: u8 = 17;

/// First vector of the reserved exception range that shares one handler.
pub const GENERIC_EXCEPTION: u8 = DEDICATED_EXCEPTIONS;

/// Last vector reserved for CPU exceptions.
pub const LAST_EXCEPTION: u8 = 31;

/// Vector of hardware IRQ 0.
pub const IRQ_BASE: u8 = MASTER_OFFSET;

/// Number of hardware IRQ lines behind the cascaded PICs.
pub const IRQ_LINES: u8 = 16;

/// Last vector used by a hardware IRQ.
pub const LAST_IRQ: u8 = IRQ_BASE + IRQ_LINES - 1;

/// The system call vector (`int 0x80`).
pub const SYSCALL: u8 = 0x80;

const _: () = {
    assert!(IRQ_BASE == LAST_EXCEPTION + 1);
    assert!(SLAVE_OFFSET == IRQ_BASE + 8);
    assert!(LAST_IRQ == 47);
    assert!(SYSCALL > LAST_IRQ);
};
