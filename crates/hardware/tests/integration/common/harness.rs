//! A memory system wired for verification.

use cachesim::config::Config;
use cachesim::core::cache::{CacheLine, LineState};
use cachesim::stats::{CacheStats, Outcome, VerificationProbe};
use cachesim::System;

pub struct TestHarness {
    pub sys: System,
}

impl TestHarness {
    /// 64-byte blocks, 64 sets, `ways` lines per set, 1 MiB of DRAM.
    pub fn with_ways(ways: usize) -> Self {
        let mut config = Config::default();
        config.cache.ways = ways;
        config.memory.size_bytes = 1 << 20;
        Self::with_config(&config)
    }

    pub fn with_config(config: &Config) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let sys = System::with_probe(config, Box::new(VerificationProbe::new()))
            .expect("valid test configuration");
        Self { sys }
    }

    pub fn stats(&self) -> CacheStats {
        self.sys.stats().expect("verification probe keeps counters")
    }

    pub fn outcome(&self) -> Outcome {
        self.sys.last_outcome().expect("at least one access")
    }

    /// The valid line holding `addr`'s block, if cached.
    pub fn line_for(&self, addr: u64) -> Option<&CacheLine> {
        let layout = self.sys.cache.layout();
        let a = layout.decode(addr.into());
        self.sys
            .cache
            .set(a.index)
            .lines()
            .iter()
            .find(|l| l.state() != LineState::Invalid && l.tag() == a.tag)
    }

    pub fn dram_u8(&self, addr: u64) -> u8 {
        self.sys.dram.read_u8(addr).expect("in range")
    }
}
