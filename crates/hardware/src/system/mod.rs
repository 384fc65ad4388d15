//! The memory system seen by an instruction-execution layer.
//!
//! [`System`] owns one SRAM cache and the DRAM behind it. With the cache
//! enabled, every byte of a byte, word or instruction access goes through
//! the cache, so multi-byte accesses stay coherent with single-byte ones.
//! With it disabled, accessors go straight to DRAM and the cache is inert.

pub mod memory;

use log::debug;

use crate::common::{MemError, PhysAddr, Result};
use crate::config::Config;
use crate::core::SramCache;
use crate::stats::{CacheProbe, CacheStats, NoProbe, Outcome};

use self::memory::Dram;

pub struct System {
    pub dram: Dram,
    pub cache: SramCache,
    cached: bool,
}

impl System {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_probe(config, Box::new(NoProbe))
    }

    /// Builds a system whose cache reports to `probe`.
    pub fn with_probe(config: &Config, probe: Box<dyn CacheProbe>) -> Result<Self> {
        config.validate()?;
        let cache = SramCache::with_probe(&config.cache, probe)?;
        let dram = Dram::from_config(&config.memory);
        debug!(
            "memory system: {} B DRAM, cache {}",
            dram.size(),
            if config.cache.enabled { "enabled" } else { "bypassed" }
        );
        Ok(Self {
            dram,
            cache,
            cached: config.cache.enabled,
        })
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub fn stats(&self) -> Option<CacheStats> {
        self.cache.stats()
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.cache.last_outcome()
    }

    pub fn read_byte(&mut self, paddr: u64) -> Result<u8> {
        if !self.cached {
            return self.dram.read_u8(paddr);
        }
        self.dram.check_bounds(paddr, 1)?;
        self.cache.read_byte(PhysAddr::new(paddr), &mut self.dram)
    }

    pub fn write_byte(&mut self, paddr: u64, val: u8) -> Result<()> {
        if !self.cached {
            return self.dram.write_u8(paddr, val);
        }
        self.dram.check_bounds(paddr, 1)?;
        self.cache.write_byte(PhysAddr::new(paddr), val, &mut self.dram)
    }

    pub fn read_u64(&mut self, paddr: u64) -> Result<u64> {
        if !self.cached {
            return self.dram.read_u64(paddr);
        }
        self.dram.check_bounds(paddr, 8)?;
        let Self { dram, cache, .. } = self;
        split_load(paddr, 8, |a| cache.read_byte(PhysAddr::new(a), &mut *dram))
    }

    pub fn write_u64(&mut self, paddr: u64, val: u64) -> Result<()> {
        if !self.cached {
            return self.dram.write_u64(paddr, val);
        }
        self.dram.check_bounds(paddr, 8)?;
        let Self { dram, cache, .. } = self;
        split_store(paddr, 8, val, |a, b| {
            cache.write_byte(PhysAddr::new(a), b, &mut *dram)
        })
    }

    /// Reads the fixed-length instruction buffer at `paddr`.
    pub fn read_instruction(&mut self, paddr: u64) -> Result<Vec<u8>> {
        if !self.cached {
            return self.dram.read_instruction(paddr);
        }
        let n = self.dram.max_instruction_char();
        self.dram.check_bounds(paddr, n)?;
        let Self { dram, cache, .. } = self;
        (0..n as u64)
            .map(|i| cache.read_byte(PhysAddr::new(paddr + i), &mut *dram))
            .collect()
    }

    /// Writes `text` zero-padded to the instruction buffer length.
    pub fn write_instruction(&mut self, paddr: u64, text: &str) -> Result<()> {
        if !self.cached {
            return self.dram.write_instruction(paddr, text);
        }
        let n = self.dram.max_instruction_char();
        let raw = text.as_bytes();
        if raw.len() >= n {
            return Err(MemError::InstructionTooLong {
                len: raw.len(),
                max: n,
            });
        }
        self.dram.check_bounds(paddr, n)?;
        let Self { dram, cache, .. } = self;
        for i in 0..n {
            let b = raw.get(i).copied().unwrap_or(0);
            cache.write_byte(PhysAddr::new(paddr + i as u64), b, &mut *dram)?;
        }
        Ok(())
    }

    /// Loads an image into DRAM, dropping any cached copies of its blocks.
    pub fn load_binary_at(&mut self, data: &[u8], paddr: u64) -> Result<()> {
        self.dram.check_bounds(paddr, data.len())?;
        if self.cached {
            // Dirty bytes outside the image must survive the invalidation.
            self.cache.flush(&mut self.dram)?;
        }
        self.dram.load(data, paddr)?;
        if self.cached && !data.is_empty() {
            let layout = *self.cache.layout();
            let first = layout.block_base(PhysAddr::new(paddr)).val();
            let end = paddr + data.len() as u64;
            let step = layout.block_bytes() as u64;
            let mut block = first;
            while block < end {
                self.cache.invalidate(PhysAddr::new(block));
                block += step;
            }
        }
        Ok(())
    }

    /// Writes all dirty cache lines back so DRAM reflects every store.
    pub fn flush(&mut self) -> Result<usize> {
        if !self.cached {
            return Ok(0);
        }
        self.cache.flush(&mut self.dram)
    }
}

/// Assembles `size` bytes starting at `addr` in little-endian order.
fn split_load<F>(addr: u64, size: u64, mut read_byte: F) -> Result<u64>
where
    F: FnMut(u64) -> Result<u8>,
{
    let mut result: u64 = 0;
    for i in 0..size {
        let byte = read_byte(addr + i)? as u64;
        result |= byte << (i * 8);
    }
    Ok(result)
}

/// Splits `val` into `size` little-endian byte writes starting at `addr`.
fn split_store<F>(addr: u64, size: u64, val: u64, mut write_byte: F) -> Result<()>
where
    F: FnMut(u64, u8) -> Result<()>,
{
    for i in 0..size {
        let byte = ((val >> (i * 8)) & 0xFF) as u8;
        write_byte(addr + i, byte)?;
    }
    Ok(())
}
