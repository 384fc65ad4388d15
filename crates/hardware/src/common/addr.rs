//! Physical address views.
//!
//! A physical address is 52 bits wide and is read two ways:
//! - the cache view splits it into tag, set index and block offset, with
//!   widths taken from an [`AddressLayout`];
//! - the paging view splits it into a 40-bit page number and a 12-bit
//!   page offset.

use super::constants::{PAGE_OFFSET_BITS, PHYSICAL_ADDRESS_BITS, PHYSICAL_ADDRESS_MASK};
use super::error::{MemError, Result};

const MAX_OFFSET_BITS: u32 = 20;
const MAX_INDEX_BITS: u32 = 24;

/// A 52-bit physical address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PhysAddr(pub u64);

impl PhysAddr {
    /// Wraps a raw value, dropping bits above the physical address width.
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr & PHYSICAL_ADDRESS_MASK)
    }

    #[inline(always)]
    pub fn val(&self) -> u64 {
        self.0
    }

    pub fn page_number(&self) -> u64 {
        self.0 >> PAGE_OFFSET_BITS
    }

    pub fn page_offset(&self) -> u64 {
        self.0 & ((1 << PAGE_OFFSET_BITS) - 1)
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self::new(addr)
    }
}

/// Cache view of a physical address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheAddr {
    pub tag: u64,
    pub index: usize,
    pub offset: usize,
}

/// Bit widths of the offset and index fields; the tag takes the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressLayout {
    /// Builds a layout, rejecting widths that leave no room for a tag.
    pub fn new(offset_bits: u32, index_bits: u32) -> Result<Self> {
        // Blocks and sets are materialised in memory.
        if offset_bits > MAX_OFFSET_BITS || index_bits > MAX_INDEX_BITS {
            return Err(MemError::InvalidConfig(format!(
                "geometry too large: {offset_bits} offset bits, {index_bits} index bits"
            )));
        }
        if offset_bits + index_bits >= PHYSICAL_ADDRESS_BITS {
            return Err(MemError::InvalidConfig(format!(
                "offset ({offset_bits}) + index ({index_bits}) bits must be below {PHYSICAL_ADDRESS_BITS}"
            )));
        }
        Ok(Self {
            offset_bits,
            index_bits,
        })
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    pub fn tag_bits(&self) -> u32 {
        PHYSICAL_ADDRESS_BITS - self.offset_bits - self.index_bits
    }

    pub fn block_bytes(&self) -> usize {
        1 << self.offset_bits
    }

    pub fn num_sets(&self) -> usize {
        1 << self.index_bits
    }

    /// Splits `addr` into tag, index and offset. Masking only.
    #[inline]
    pub fn decode(&self, addr: PhysAddr) -> CacheAddr {
        let raw = addr.val();
        let offset = raw & ((1 << self.offset_bits) - 1);
        let index = (raw >> self.offset_bits) & ((1 << self.index_bits) - 1);
        let tag = (raw >> (self.offset_bits + self.index_bits)) & ((1 << self.tag_bits()) - 1);
        CacheAddr {
            tag,
            index: index as usize,
            offset: offset as usize,
        }
    }

    /// Address of the first byte of the block holding `addr`.
    #[inline]
    pub fn block_base(&self, addr: PhysAddr) -> PhysAddr {
        PhysAddr::new(addr.val() & !((1 << self.offset_bits) - 1))
    }

    /// Rebuilds the block base address from a tag and a set index.
    #[inline]
    pub fn compose(&self, tag: u64, index: usize) -> PhysAddr {
        PhysAddr::new(
            (tag << (self.offset_bits + self.index_bits)) | ((index as u64) << self.offset_bits),
        )
    }
}
