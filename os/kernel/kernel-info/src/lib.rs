//! # Kernel Architecture Layout
//!
//! This crate is the single source of truth for the fixed, architecture-mandated
//! numbers the early-boot code relies on. Nothing here is computed at runtime;
//! every constant is `const` and cross-checked by compile-time assertions so a
//! typo breaks the build instead of the boot.
//!
//! ## Modules
//!
//! ### Structure Layout ([`layout`])
//! Byte sizes of the i386 hardware structures (segment descriptor, gate
//! descriptor, table pointer, TSS) and the number of entries in each table.
//!
//! ### Interrupt Vectors ([`vectors`])
//! How the 256 IDT vectors are carved up:
//!
//! ```text
//!   0 ..=  16   CPU exceptions with dedicated handlers
//!  17 ..=  31   reserved exception range (one shared handler)
//!  32 ..=  47   hardware IRQ 0..15 (after PIC remapping)
//!  48 ..= 127   unused
//!        128    system call gate (int 0x80)
//! 129 ..= 255   unused
//! ```
//!
//! ### Interrupt Controller ([`pic`])
//! I/O ports and initialization command words of the cascaded 8259 pair.
//!
//! ## Usage
//! ```rust
//! use kernel_info::{layout, vectors};
//!
//! assert_eq!(layout::GDT_ENTRY_SIZE, 8);
//! assert_eq!(vectors::SYSCALL, 0x80);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod layout;
pub mod pic;
pub mod vectors;
