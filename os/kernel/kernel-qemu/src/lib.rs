//! # QEMU Debug Port Diagnostics
//!
//! Early boot has no console: the descriptor tables are not even loaded yet.
//! QEMU exposes a write-only debug port (`-debugcon`, I/O port `0x402`) that
//! needs no setup at all, so this crate routes diagnostics there.
//!
//! ```text
//! log::info!(..) ─► QemuLogger ─► qemu_trace! ─► QemuSink ─► out 0x402
//! ```
//!
//! ## Components
//! * [`QemuLogger`]: a [`log::Log`] backend with a level threshold.
//! * [`qemu_trace!`]: `format_args!`-style output that bypasses `log`.
//! * [`qemu_fmt::QemuSink`]: the [`core::fmt::Write`] sink behind both.
//!
//! ## Features
//! * `enabled` (default): port writes are compiled in.
//! * without `enabled`: every output path is a no-op, so release images can
//!   drop the debug device entirely.
//!
//! ## Usage
//! ```rust,no_run
//! use kernel_qemu::QemuLogger;
//! use log::{LevelFilter, info};
//!
//! static LOGGER: QemuLogger = QemuLogger::new(LevelFilter::Debug);
//!
//! LOGGER.install().expect("logger installed twice");
//! info!("gdt at {:#x}", 0x0010_2000);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;

pub use logger::QemuLogger;

#[cfg(feature = "enabled")]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt::{self, Write};

    /// The port number for QEMU's debug port.
    pub const QEMU_DEBUG_PORT: u16 = 0x402;

    /// Write a single byte to QEMU's debug port.
    #[allow(clippy::inline_always)]
    #[inline(always)]
    pub fn dbg_putc(c: u8) {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") QEMU_DEBUG_PORT,
                in("al") c,
                options(nomem, nostack, preserves_flags)
            );
        }
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        let _ = c;
    }

    pub struct QemuSink;

    impl Write for QemuSink {
        #[inline]
        fn write_str(&mut self, s: &str) -> fmt::Result {
            for b in s.bytes() {
                dbg_putc(b);
            }
            Ok(())
        }
    }

    #[doc(hidden)]
    #[inline]
    pub fn qemu_write(args: fmt::Arguments) {
        // Best effort; the sink itself never fails.
        let _ = fmt::write(&mut QemuSink, args);
    }
}

#[cfg(not(feature = "enabled"))]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt;

    #[doc(hidden)]
    #[inline(always)]
    #[allow(clippy::inline_always, clippy::needless_pass_by_value)]
    pub const fn qemu_write(_: fmt::Arguments) {}
}

/// Write `format_args!`-style output straight to the debug port.
#[macro_export]
macro_rules! qemu_trace {
    ($($arg:tt)*) => {{
        $crate::qemu_fmt::qemu_write(core::format_args!($($arg)*));
    }};
}
