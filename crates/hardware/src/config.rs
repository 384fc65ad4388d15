//! Simulator configuration.
//!
//! Every struct deserialises with defaults for missing fields, so a JSON
//! file only needs to name what it changes:
//!
//! ```json
//! { "cache": { "ways": 2, "index_bits": 4 } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::common::constants::{
    DEFAULT_INDEX_BITS, DEFAULT_MEMORY_BYTES, DEFAULT_OFFSET_BITS, DEFAULT_WAYS,
    MAX_INSTRUCTION_CHAR,
};
use crate::common::{AddressLayout, MemError, Result};

/// Upper bound on associativity; beyond this a set no longer fits a sane allocation.
pub const MAX_WAYS: usize = 1 << 16;

/// Upper bound on the bytes held by all cache lines together.
pub const MAX_CACHE_BYTES: usize = 1 << 30;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub memory: MemoryConfig,
}

/// SRAM cache geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false, accessors go straight to DRAM and the cache stays inert.
    pub enabled: bool,
    /// Block size is `2^offset_bits` bytes.
    pub offset_bits: u32,
    /// Number of sets is `2^index_bits`.
    pub index_bits: u32,
    /// Lines per set (E).
    pub ways: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offset_bits: DEFAULT_OFFSET_BITS,
            index_bits: DEFAULT_INDEX_BITS,
            ways: DEFAULT_WAYS,
        }
    }
}

/// DRAM backing store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub size_bytes: usize,
    /// Length of the fixed instruction buffer.
    pub max_instruction_char: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: DEFAULT_MEMORY_BYTES,
            max_instruction_char: MAX_INSTRUCTION_CHAR,
        }
    }
}

impl CacheConfig {
    /// Address layout implied by the offset and index widths.
    pub fn layout(&self) -> Result<AddressLayout> {
        AddressLayout::new(self.offset_bits, self.index_bits)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = self.layout()?;
        if self.ways == 0 || self.ways > MAX_WAYS {
            return Err(MemError::InvalidConfig(format!(
                "ways must be in 1..={MAX_WAYS}, got {}",
                self.ways
            )));
        }
        let capacity = layout
            .num_sets()
            .checked_mul(self.ways)
            .and_then(|lines| lines.checked_mul(layout.block_bytes()))
            .filter(|&bytes| bytes <= MAX_CACHE_BYTES);
        if capacity.is_none() {
            return Err(MemError::InvalidConfig(format!(
                "cache of {} sets x {} ways x {} B exceeds {MAX_CACHE_BYTES} B",
                layout.num_sets(),
                self.ways,
                layout.block_bytes()
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks that the cache and memory can be built together.
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;

        let block = self.cache.layout()?.block_bytes();
        if self.memory.size_bytes == 0 || self.memory.size_bytes % block != 0 {
            return Err(MemError::InvalidConfig(format!(
                "memory size {} must be a non-zero multiple of the {block}-byte block",
                self.memory.size_bytes
            )));
        }
        if self.memory.max_instruction_char == 0
            || self.memory.max_instruction_char > self.memory.size_bytes
        {
            return Err(MemError::InvalidConfig(format!(
                "instruction buffer of {} bytes does not fit memory",
                self.memory.max_instruction_char
            )));
        }
        Ok(())
    }
}
