//! SRAM cache and DRAM backing-store model for a CPU emulator.
//!
//! A set-associative, write-back, write-allocate cache sits in front of a
//! flat byte-addressable DRAM. Physical addresses are 52 bits wide and are
//! split into tag, set index and block offset by an [`common::AddressLayout`]
//! whose widths come from [`config::CacheConfig`].
//!
//! - [`system::System`] is the entry point for an execution layer: byte,
//!   word and instruction accessors routed through the cache.
//! - [`core::SramCache`] is the replacement engine itself.
//! - [`stats`] holds the instrumentation used to verify traces against a
//!   reference simulator, and [`sim::trace`] replays such traces.

pub mod common;
pub mod config;
pub mod core;
pub mod sim;
pub mod stats;
pub mod system;

pub use crate::common::{MemError, PhysAddr, Result};
pub use crate::config::Config;
pub use crate::core::SramCache;
pub use crate::system::System;
