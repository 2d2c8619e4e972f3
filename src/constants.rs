// Page size is fixed at 4 KiB and virtual addresses are 32 bits wide.
pub const PAGE_SIZE_BITS: u32 = 12;
pub const VIRTUAL_ADDR_BITS: u32 = 32;

pub const PAGE_SIZE: usize = 1 << PAGE_SIZE_BITS;
pub const OFFSET_MASK: u32 = (1 << PAGE_SIZE_BITS) - 1;

/// Bits left for the virtual page number once the offset is removed
pub const VPN_BITS: u32 = VIRTUAL_ADDR_BITS - PAGE_SIZE_BITS;

/// Entries in a flat (one-level) page table: one per virtual page
pub const SINGLE_LEVEL_TABLE_SIZE: usize = 1 << VPN_BITS;

// The frame index has to fit the 32-bit physical address model
pub const MAX_PHYS_MEM_BITS: u32 = VIRTUAL_ADDR_BITS;
