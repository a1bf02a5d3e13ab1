//! # Early-boot descriptor tables for i386
//!
//! Brings the CPU from "whatever the bootloader left" to a flat protected-mode
//! environment with working interrupt routing:
//!
//! ```text
//!           ┌─────────────┐
//!  build ─► │ GDT (6)     │ null, kernel code/data, user code/data, TSS
//!           │ TSS (104 B) │ ss0 = kernel data, no I/O bitmap
//!           │ IDT (256)   │ exceptions, IRQs, int 0x80
//!           └─────────────┘
//!  install ─► PIC remap ─► lgdt ─► segment reload ─► lidt ─► ltr
//! ```
//!
//! Encoding is pure and host-testable ([`gdt`], [`idt`], [`tss`], [`pointer`]);
//! every privileged instruction goes through the [`hardware`] traits so the
//! whole sequence in [`setup`] can run against a recorder.
//!
//! ## Selectors
//!
//! | Selector | Value  | Segment          |
//! |----------|--------|------------------|
//! | `KERNEL_CS` | `0x08` | ring-0 code   |
//! | `KERNEL_DS` | `0x10` | ring-0 data   |
//! | `USER_CS`   | `0x1b` | ring-3 code   |
//! | `USER_DS`   | `0x23` | ring-3 data   |
//! | `TSS_SEL`   | `0x28` | task state    |

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod addresses;
pub mod arch;
pub mod gdt;
pub mod hardware;
pub mod idt;
pub mod pic;
pub mod pointer;
pub mod privilege;
pub mod setup;
pub mod tss;

pub use setup::{BootSequence, DescriptorTables, LoadedTables, setup};
