//! Set-associative SRAM cache.
//!
//! Write-back, write-allocate, with LRU replacement tracked by per-line
//! aging counters. Every access, hit or miss, first ages all lines of the
//! addressed set; the touched line is then reset to zero. The eviction
//! victim is the first line to reach the largest age, which keeps the
//! hit/miss/eviction trace identical to the reference simulator.
//!
//! The cache owns no memory below it: the backing store is passed into each
//! access, so one store can also be reached directly when caching is off.

pub mod set;

pub use self::set::{CacheLine, CacheSet, LineState};

use log::{debug, trace};
use std::fmt;

use crate::common::{AddressLayout, CacheAddr, PhysAddr, Result};
use crate::config::CacheConfig;
use crate::stats::{CacheEvent, CacheProbe, CacheStats, NoProbe, Outcome};
use crate::system::memory::LineStore;

pub struct SramCache {
    layout: AddressLayout,
    ways: usize,
    sets: Vec<CacheSet>,
    probe: Box<dyn CacheProbe>,
}

impl SramCache {
    /// Builds an empty cache that reports to no one.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Self::with_probe(config, Box::new(NoProbe))
    }

    /// Builds an empty cache reporting every access to `probe`.
    pub fn with_probe(config: &CacheConfig, probe: Box<dyn CacheProbe>) -> Result<Self> {
        config.validate()?;
        let layout = config.layout()?;

        debug!(
            "SRAM cache: {} sets x {} ways x {} B blocks ({} B)",
            layout.num_sets(),
            config.ways,
            layout.block_bytes(),
            layout.num_sets() * config.ways * layout.block_bytes()
        );

        Ok(Self {
            layout,
            ways: config.ways,
            sets: vec![CacheSet::new(config.ways, layout.block_bytes()); layout.num_sets()],
            probe,
        })
    }

    pub fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    pub fn ways(&self) -> usize {
        self.ways
    }

    pub fn capacity_bytes(&self) -> usize {
        self.sets.len() * self.ways * self.layout.block_bytes()
    }

    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// # Panics
    /// Panics if `index` is not below the number of sets.
    pub fn set(&self, index: usize) -> &CacheSet {
        &self.sets[index]
    }

    pub fn probe(&self) -> &dyn CacheProbe {
        self.probe.as_ref()
    }

    pub fn probe_mut(&mut self) -> &mut dyn CacheProbe {
        self.probe.as_mut()
    }

    /// Snapshot of the probe's counters, if it keeps any.
    pub fn stats(&self) -> Option<CacheStats> {
        self.probe.stats().copied()
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.probe.last_outcome()
    }

    /// Reads one byte, filling its block from `store` on a miss.
    pub fn read_byte<S>(&mut self, addr: PhysAddr, store: &mut S) -> Result<u8>
    where
        S: LineStore + ?Sized,
    {
        let (a, way) = self.access(addr, store)?;
        Ok(self.sets[a.index].lines[way].block[a.offset])
    }

    /// Writes one byte, allocating its block on a miss. The line ends Dirty.
    pub fn write_byte<S>(&mut self, addr: PhysAddr, value: u8, store: &mut S) -> Result<()>
    where
        S: LineStore + ?Sized,
    {
        let (a, way) = self.access(addr, store)?;
        let line = &mut self.sets[a.index].lines[way];
        line.block[a.offset] = value;
        if line.state != LineState::Dirty {
            line.state = LineState::Dirty;
            self.probe.record(CacheEvent::Dirtied {
                bytes: self.layout.block_bytes() as u64,
            });
        }
        Ok(())
    }

    /// Writes every dirty line back to `store` and marks it Clean.
    ///
    /// Not an access: recency and hit/miss counters are left alone.
    /// Returns the number of lines written.
    pub fn flush<S>(&mut self, store: &mut S) -> Result<usize>
    where
        S: LineStore + ?Sized,
    {
        let layout = self.layout;
        let bytes = layout.block_bytes() as u64;
        let mut written = 0;

        for (index, set) in self.sets.iter_mut().enumerate() {
            for line in set.lines.iter_mut() {
                if line.state == LineState::Dirty {
                    store.write_block(layout.compose(line.tag, index), &line.block)?;
                    line.state = LineState::Clean;
                    self.probe.record(CacheEvent::Cleaned { bytes });
                    written += 1;
                }
            }
        }
        if written > 0 {
            debug!("flushed {} dirty lines", written);
        }
        Ok(written)
    }

    /// Drops the line holding `addr`'s block without writing it back.
    /// Returns true if a line was dropped.
    pub fn invalidate(&mut self, addr: PhysAddr) -> bool {
        let a = self.layout.decode(addr);
        let set = &mut self.sets[a.index];
        match set.find(a.tag) {
            Some(way) => {
                set.lines[way].state = LineState::Invalid;
                true
            }
            None => false,
        }
    }

    /// Resolves `addr` to a valid line, going to `store` on a miss.
    fn access<S>(&mut self, addr: PhysAddr, store: &mut S) -> Result<(CacheAddr, usize)>
    where
        S: LineStore + ?Sized,
    {
        let layout = self.layout;
        let block_bytes = layout.block_bytes();
        let base = layout.block_base(addr);
        store.check_block(base, block_bytes)?;

        let a = layout.decode(addr);
        let set = &mut self.sets[a.index];
        let candidates = set.age();

        if let Some(way) = set.find(a.tag) {
            set.lines[way].recency = 0;
            self.probe.record(CacheEvent::Hit);
            return Ok((a, way));
        }

        self.probe.record(CacheEvent::Miss);

        let way = match candidates.free {
            Some(way) => way,
            None => {
                let way = candidates.victim;
                let victim = &mut set.lines[way];
                let dirty = victim.state == LineState::Dirty;
                if dirty {
                    // Write back to the victim's own block, not the incoming one.
                    let victim_base = layout.compose(victim.tag, a.index);
                    trace!(
                        "evict set {:#x} way {}: write back {:#x}",
                        a.index,
                        way,
                        victim_base.val()
                    );
                    store.write_block(victim_base, &victim.block)?;
                } else {
                    trace!("evict set {:#x} way {}: clean discard", a.index, way);
                }
                self.probe.record(CacheEvent::Eviction {
                    dirty,
                    bytes: block_bytes as u64,
                });
                victim.state = LineState::Invalid;
                way
            }
        };

        let line = &mut set.lines[way];
        store.read_block(base, &mut line.block)?;
        line.state = LineState::Clean;
        line.tag = a.tag;
        line.recency = 0;

        Ok((a, way))
    }
}

impl fmt::Display for SramCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, set) in self.sets.iter().enumerate() {
            writeln!(f, "set {:x}: {}", index, set)?;
        }
        Ok(())
    }
}
