//! Memory trace replay.
//!
//! Reads traces in the format produced by `valgrind --tool=lackey
//! --trace-mem=yes` and consumed by reference cache simulators:
//!
//! ```text
//! I 0400d7d4,8
//!  L 7ff0005b8,8
//!  S 7ff0005c8,8
//!  M 0421c7f0,4
//! ```
//!
//! Instruction fetches (`I`) are skipped. A modify (`M`) is a load followed
//! by a store to the same address, so it yields two outcomes.

use std::fmt;

use crate::common::{MemError, PhysAddr, Result};
use crate::config::CacheConfig;
use crate::core::SramCache;
use crate::stats::{CacheStats, Outcome, VerificationProbe};
use crate::system::memory::DetachedStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOp {
    Load,
    Store,
    Modify,
}

impl TraceOp {
    fn letter(&self) -> char {
        match self {
            TraceOp::Load => 'L',
            TraceOp::Store => 'S',
            TraceOp::Modify => 'M',
        }
    }
}

/// One data access from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    pub op: TraceOp,
    pub addr: u64,
    pub size: u32,
    /// 1-based line in the source text.
    pub line: usize,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.op.letter(), self.addr, self.size)
    }
}

/// Parses a whole trace. Blank lines and instruction fetches are dropped.
pub fn parse_trace(text: &str) -> Result<Vec<TraceRecord>> {
    let mut records = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        if let Some(record) = parse_line(i + 1, raw)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn parse_line(line: usize, raw: &str) -> Result<Option<TraceRecord>> {
    let bad = |reason: String| MemError::Trace { line, reason };

    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let mut chars = text.chars();
    let op = match chars.next() {
        Some('I') => return Ok(None),
        Some('L') => TraceOp::Load,
        Some('S') => TraceOp::Store,
        Some('M') => TraceOp::Modify,
        other => return Err(bad(format!("unknown operation {other:?}"))),
    };

    let (addr, size) = chars
        .as_str()
        .trim()
        .split_once(',')
        .ok_or_else(|| bad("expected <addr>,<size>".into()))?;
    let addr = u64::from_str_radix(addr.trim(), 16)
        .map_err(|e| bad(format!("bad address {addr:?}: {e}")))?;
    let size = size
        .trim()
        .parse::<u32>()
        .map_err(|e| bad(format!("bad size {size:?}: {e}")))?;

    Ok(Some(TraceRecord {
        op,
        addr,
        size,
        line,
    }))
}

/// Drives a counting cache over a detached store.
pub struct Replay {
    cache: SramCache,
    store: DetachedStore,
}

impl Replay {
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Ok(Self {
            cache: SramCache::with_probe(config, Box::new(VerificationProbe::new()))?,
            store: DetachedStore::new(),
        })
    }

    pub fn cache(&self) -> &SramCache {
        &self.cache
    }

    pub fn store(&self) -> &DetachedStore {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats().unwrap_or_default()
    }

    /// Applies one record and returns the outcome of each access it made.
    pub fn step(&mut self, record: &TraceRecord) -> Result<Vec<Outcome>> {
        let addr = PhysAddr::new(record.addr);
        let mut outcomes = Vec::with_capacity(2);

        if matches!(record.op, TraceOp::Load | TraceOp::Modify) {
            self.cache.read_byte(addr, &mut self.store)?;
            outcomes.extend(self.cache.last_outcome());
        }
        if matches!(record.op, TraceOp::Store | TraceOp::Modify) {
            self.cache.write_byte(addr, 0, &mut self.store)?;
            outcomes.extend(self.cache.last_outcome());
        }
        Ok(outcomes)
    }

    /// Replays `records` in order, handing each record's outcomes to `observe`.
    pub fn run<F>(&mut self, records: &[TraceRecord], mut observe: F) -> Result<CacheStats>
    where
        F: FnMut(&TraceRecord, &[Outcome]),
    {
        for record in records {
            let outcomes = self.step(record)?;
            observe(record, &outcomes);
        }
        Ok(self.stats())
    }
}

/// Parses and replays `text`, returning the final counters.
pub fn replay_trace(text: &str, config: &CacheConfig) -> Result<CacheStats> {
    let records = parse_trace(text)?;
    Replay::new(config)?.run(&records, |_, _| {})
}

/// Renders a record with its outcomes, e.g. `M 20,1 miss hit`.
pub fn verbose_line(record: &TraceRecord, outcomes: &[Outcome]) -> String {
    let mut line = record.to_string();
    for outcome in outcomes {
        line.push(' ');
        line.push_str(outcome.as_str());
    }
    line
}
