//! # Descriptor Table Layout (i386)

/// Size of one GDT entry (segment descriptor) in bytes.
pub const GDT_ENTRY_SIZE: usize = 8;

/// Size of one IDT entry (gate descriptor) in bytes.
pub const IDT_ENTRY_SIZE: usize = 8;

/// Size of the operand of `lgdt`/`lidt`: 16-bit limit followed by a 32-bit base.
pub const TABLE_POINTER_SIZE: usize = 6;

/// Size of the 32-bit Task State Segment.
pub const TSS_SIZE: usize = 104;

/// Number of entries in the GDT.
pub const GDT_ENTRIES: usize = 6;

/// Number of entries in the IDT.
pub const IDT_ENTRIES: usize = 256;

/// GDT index of the mandatory null descriptor.
pub const GDT_NULL: u16 = 0;

/// GDT index of the ring-0 code segment.
pub const GDT_KERNEL_CODE: u16 = 1;

/// GDT index of the ring-0 data segment.
pub const GDT_KERNEL_DATA: u16 = 2;

/// GDT index of the ring-3 code segment.
pub const GDT_USER_CODE: u16 = 3;

/// GDT index of the ring-3 data segment.
pub const GDT_USER_DATA: u16 = 4;

/// GDT index of the TSS system descriptor.
pub const GDT_TSS: u16 = 5;

/// Highest value a 20-bit segment limit can take.
pub const SEGMENT_LIMIT_MAX: u32 = 0xF_FFFF;

const _: () = {
    assert!(GDT_TSS as usize == GDT_ENTRIES - 1);
    // Table limits are 16-bit: no table may exceed 64 KiB.
    assert!(GDT_ENTRIES * GDT_ENTRY_SIZE <= 1 << 16);
    assert!(IDT_ENTRIES * IDT_ENTRY_SIZE <= 1 << 16);
    // The I/O map base lives in a 16-bit field and points at the end of the TSS.
    assert!(TSS_SIZE <= 1 << 16);
};
