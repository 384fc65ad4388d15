//! Architectural and default geometry constants.

/// Width of a physical address in bits.
pub const PHYSICAL_ADDRESS_BITS: u32 = 52;

/// Mask selecting the implemented physical address bits.
pub const PHYSICAL_ADDRESS_MASK: u64 = (1 << PHYSICAL_ADDRESS_BITS) - 1;

/// Width of the page offset field in the paging view.
pub const PAGE_OFFSET_BITS: u32 = 12;

/// Width of the physical page number field in the paging view.
pub const PAGE_NUMBER_BITS: u32 = PHYSICAL_ADDRESS_BITS - PAGE_OFFSET_BITS;

/// Default block offset width (64-byte blocks).
pub const DEFAULT_OFFSET_BITS: u32 = 6;

/// Default set index width (64 sets).
pub const DEFAULT_INDEX_BITS: u32 = 6;

/// Default associativity.
pub const DEFAULT_WAYS: usize = 8;

/// Default DRAM size in bytes.
pub const DEFAULT_MEMORY_BYTES: usize = 65536;

/// Default fixed instruction buffer length, in bytes.
pub const MAX_INSTRUCTION_CHAR: usize = 64;
