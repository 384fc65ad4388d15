//! Cache lines and sets, with the aging-counter LRU bookkeeping.

use std::fmt;

/// Coherence state of a line under write-back, write-allocate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineState {
    #[default]
    Invalid,
    Clean,
    Dirty,
}

impl LineState {
    pub fn is_valid(&self) -> bool {
        *self != LineState::Invalid
    }

    fn letter(&self) -> char {
        match self {
            LineState::Invalid => 'i',
            LineState::Clean => 'c',
            LineState::Dirty => 'd',
        }
    }
}

/// One way of a set.
#[derive(Clone, Debug)]
pub struct CacheLine {
    pub(crate) state: LineState,
    /// Accesses to the set since this line was last touched.
    pub(crate) recency: u64,
    pub(crate) tag: u64,
    pub(crate) block: Box<[u8]>,
}

impl CacheLine {
    fn new(block_bytes: usize) -> Self {
        Self {
            state: LineState::Invalid,
            recency: 0,
            tag: 0,
            block: vec![0; block_bytes].into_boxed_slice(),
        }
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    pub fn recency(&self) -> u64 {
        self.recency
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn block(&self) -> &[u8] {
        &self.block
    }
}

/// Lines chosen by the aging pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Candidates {
    /// First line to reach the largest recency.
    pub victim: usize,
    /// Last invalid line seen, if any.
    pub free: Option<usize>,
}

/// E lines sharing one set index.
#[derive(Clone, Debug)]
pub struct CacheSet {
    pub(crate) lines: Vec<CacheLine>,
}

impl CacheSet {
    pub(crate) fn new(ways: usize, block_bytes: usize) -> Self {
        Self {
            lines: vec![CacheLine::new(block_bytes); ways],
        }
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    pub fn valid_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.state.is_valid()).count()
    }

    /// Ages every line by one and picks the eviction and allocation candidates.
    ///
    /// Runs before the hit test, so the line that ends up hitting is aged
    /// too. Only a strictly larger recency displaces the current victim.
    pub(crate) fn age(&mut self) -> Candidates {
        let mut victim = 0;
        let mut max_recency = None;
        let mut free = None;

        for (way, line) in self.lines.iter_mut().enumerate() {
            line.recency = line.recency.saturating_add(1);
            if max_recency.is_none_or(|max| line.recency > max) {
                victim = way;
                max_recency = Some(line.recency);
            }
            if line.state == LineState::Invalid {
                free = Some(way);
            }
        }

        Candidates { victim, free }
    }

    /// Way holding a valid copy of `tag`.
    pub(crate) fn find(&self, tag: u64) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| l.state.is_valid() && l.tag == tag)
    }
}

impl fmt::Display for CacheSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        for (way, line) in self.lines.iter().enumerate() {
            if way > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "({:x}: {}, {})",
                line.tag,
                line.state.letter(),
                line.recency
            )?;
        }
        f.write_str(" ]")
    }
}
