//! # Architecture backends
//!
//! Only the i386 backend exists. On other targets the crate still builds so
//! the table logic can be tested on the host.

#[cfg(target_arch = "x86")]
pub mod i386;
