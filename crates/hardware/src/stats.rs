//! Cache instrumentation.
//!
//! The cache reports every hit, miss, eviction and clean-to-dirty transition
//! to an injected [`CacheProbe`]. [`NoProbe`] discards them; the
//! [`VerificationProbe`] keeps the counters a reference cache simulator
//! prints, plus the outcome tag of the most recent access, so a test harness
//! can diff runs record by record.

use serde::Serialize;
use std::fmt;

use crate::common::Result;

/// Result of a single cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    #[serde(rename = "hit")]
    Hit,
    #[serde(rename = "miss")]
    Miss,
    #[serde(rename = "miss eviction")]
    MissEviction,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
            Outcome::MissEviction => "miss eviction",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by the cache, in the order they happen within an access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    Hit,
    Miss,
    /// A valid line was displaced; `dirty` lines were written back first.
    Eviction { dirty: bool, bytes: u64 },
    /// A line went from Clean to Dirty.
    Dirtied { bytes: u64 },
    /// A dirty line was written back without being displaced (flush).
    Cleaned { bytes: u64 },
}

/// Observer of cache activity. Must not influence cache behaviour.
pub trait CacheProbe {
    fn record(&mut self, event: CacheEvent);

    /// Counters, if this probe keeps any.
    fn stats(&self) -> Option<&CacheStats> {
        None
    }

    /// Outcome of the most recent access, if tracked.
    fn last_outcome(&self) -> Option<Outcome> {
        None
    }

    fn reset(&mut self) {}
}

/// Production probe: records nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProbe;

impl CacheProbe for NoProbe {
    #[inline(always)]
    fn record(&mut self, _event: CacheEvent) {}
}

/// Counters matching a reference cache simulator's summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub dirty_bytes_in_cache: u64,
    pub dirty_bytes_evicted: u64,
}

impl CacheStats {
    pub fn print(&self) {
        println!("{}", self);
    }

    /// Pretty-printed JSON object of the counters.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits:{} misses:{} evictions:{} dirty_bytes_in_cache:{} dirty_bytes_evicted:{}",
            self.hits,
            self.misses,
            self.evictions,
            self.dirty_bytes_in_cache,
            self.dirty_bytes_evicted
        )
    }
}

/// Probe used when verifying against a reference trace.
#[derive(Clone, Debug, Default)]
pub struct VerificationProbe {
    stats: CacheStats,
    last: Option<Outcome>,
}

impl VerificationProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheProbe for VerificationProbe {
    fn record(&mut self, event: CacheEvent) {
        let s = &mut self.stats;
        match event {
            CacheEvent::Hit => {
                s.hits += 1;
                self.last = Some(Outcome::Hit);
            }
            CacheEvent::Miss => {
                s.misses += 1;
                self.last = Some(Outcome::Miss);
            }
            CacheEvent::Eviction { dirty, bytes } => {
                s.evictions += 1;
                if dirty {
                    s.dirty_bytes_evicted += bytes;
                    s.dirty_bytes_in_cache = s.dirty_bytes_in_cache.saturating_sub(bytes);
                }
                self.last = Some(Outcome::MissEviction);
            }
            CacheEvent::Dirtied { bytes } => s.dirty_bytes_in_cache += bytes,
            CacheEvent::Cleaned { bytes } => {
                s.dirty_bytes_in_cache = s.dirty_bytes_in_cache.saturating_sub(bytes)
            }
        }
    }

    fn stats(&self) -> Option<&CacheStats> {
        Some(&self.stats)
    }

    fn last_outcome(&self) -> Option<Outcome> {
        self.last
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
