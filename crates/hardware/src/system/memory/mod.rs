//! DRAM backing store.

pub mod detached;

pub use self::detached::DetachedStore;

use crate::common::{MemError, PhysAddr, Result};
use crate::config::MemoryConfig;

/// Block-granular memory below the SRAM cache.
///
/// The cache calls `check_block` before touching any of its own state, so a
/// rejected access leaves the cache unchanged.
pub trait LineStore {
    /// Verifies that the `len`-byte block at `addr` can be transferred.
    fn check_block(&self, addr: PhysAddr, len: usize) -> Result<()>;

    /// Fills `buf` with the aligned block containing `addr`.
    fn read_block(&mut self, addr: PhysAddr, buf: &mut [u8]) -> Result<()>;

    /// Stores `buf` as the aligned block containing `addr`.
    fn write_block(&mut self, addr: PhysAddr, buf: &[u8]) -> Result<()>;
}

/// Flat byte-addressable DRAM.
pub struct Dram {
    bytes: Vec<u8>,
    max_instruction_char: usize,
}

impl Dram {
    pub fn new(size: usize, max_instruction_char: usize) -> Self {
        Self {
            bytes: vec![0; size],
            max_instruction_char,
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.size_bytes, config.max_instruction_char)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn max_instruction_char(&self) -> usize {
        self.max_instruction_char
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the index of `addr` if `len` bytes starting there are in range.
    pub fn check_bounds(&self, addr: u64, len: usize) -> Result<usize> {
        let size = self.bytes.len();
        let start = usize::try_from(addr).ok();
        match start.and_then(|s| s.checked_add(len).map(|end| (s, end))) {
            Some((s, end)) if end <= size => Ok(s),
            _ => Err(MemError::OutOfRange { addr, len, size }),
        }
    }

    /// Copies an image into memory at `offset`.
    pub fn load(&mut self, data: &[u8], offset: u64) -> Result<()> {
        let i = self.check_bounds(offset, data.len())?;
        self.bytes[i..i + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn read_u8(&self, addr: u64) -> Result<u8> {
        let i = self.check_bounds(addr, 1)?;
        Ok(self.bytes[i])
    }

    pub fn write_u8(&mut self, addr: u64, val: u8) -> Result<()> {
        let i = self.check_bounds(addr, 1)?;
        self.bytes[i] = val;
        Ok(())
    }

    /// Little-endian: byte `i` holds bits `[8i, 8i + 8)`.
    pub fn read_u64(&self, addr: u64) -> Result<u64> {
        let i = self.check_bounds(addr, 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[i..i + 8]);
        Ok(u64::from_le_bytes(raw))
    }

    pub fn write_u64(&mut self, addr: u64, val: u64) -> Result<()> {
        let i = self.check_bounds(addr, 8)?;
        self.bytes[i..i + 8].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    /// Copies the fixed-length instruction buffer verbatim.
    pub fn read_instruction(&self, addr: u64) -> Result<Vec<u8>> {
        let n = self.max_instruction_char;
        let i = self.check_bounds(addr, n)?;
        Ok(self.bytes[i..i + n].to_vec())
    }

    /// Writes `text` and zero-pads the rest of the instruction buffer.
    pub fn write_instruction(&mut self, addr: u64, text: &str) -> Result<()> {
        let n = self.max_instruction_char;
        let raw = text.as_bytes();
        if raw.len() >= n {
            return Err(MemError::InstructionTooLong {
                len: raw.len(),
                max: n,
            });
        }
        let i = self.check_bounds(addr, n)?;
        let buf = &mut self.bytes[i..i + n];
        buf[..raw.len()].copy_from_slice(raw);
        buf[raw.len()..].fill(0);
        Ok(())
    }

    /// Reads the whole `buf.len()`-aligned block containing `addr`.
    pub fn read_cacheline(&self, addr: PhysAddr, buf: &mut [u8]) -> Result<()> {
        let i = self.block_start(addr, buf.len())?;
        buf.copy_from_slice(&self.bytes[i..i + buf.len()]);
        Ok(())
    }

    /// Writes `buf` over the whole `buf.len()`-aligned block containing `addr`.
    pub fn write_cacheline(&mut self, addr: PhysAddr, buf: &[u8]) -> Result<()> {
        let i = self.block_start(addr, buf.len())?;
        self.bytes[i..i + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn block_start(&self, addr: PhysAddr, len: usize) -> Result<usize> {
        if !len.is_power_of_two() {
            return Err(MemError::InvalidConfig(format!(
                "block of {len} bytes is not a power of two"
            )));
        }
        let base = addr.val() & !(len as u64 - 1);
        self.check_bounds(base, len)
    }
}

impl LineStore for Dram {
    fn check_block(&self, addr: PhysAddr, len: usize) -> Result<()> {
        self.block_start(addr, len).map(|_| ())
    }

    fn read_block(&mut self, addr: PhysAddr, buf: &mut [u8]) -> Result<()> {
        self.read_cacheline(addr, buf)
    }

    fn write_block(&mut self, addr: PhysAddr, buf: &[u8]) -> Result<()> {
        self.write_cacheline(addr, buf)
    }
}
