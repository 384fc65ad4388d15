//! Simulation drivers.

pub mod trace;
