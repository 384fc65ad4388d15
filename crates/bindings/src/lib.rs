//! Python bindings for the cachesim memory hierarchy.
//!
//! Exposes a `MemorySystem` class and a `replay_trace` function so external
//! harnesses can drive the cache and diff its outcomes against a reference
//! simulator.

use pyo3::prelude::*;

pub mod conversion;
pub mod stats;
pub mod system;

use crate::stats::PyStats;
use crate::system::PyMemorySystem;

/// Replays a memory trace on a counting cache and returns its statistics.
///
/// # Errors
///
/// Raises `ValueError` for a malformed trace or configuration.
#[pyfunction]
#[pyo3(signature = (text, config_json=None))]
fn replay_trace(text: &str, config_json: Option<&str>) -> PyResult<PyStats> {
    let config = conversion::parse_config(config_json)?;
    cachesim::sim::trace::replay_trace(text, &config.cache)
        .map(PyStats::from)
        .map_err(conversion::to_py_err)
}

/// Registers the classes and functions of the `_core` module.
pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMemorySystem>()?;
    m.add_class::<PyStats>()?;
    m.add_function(wrap_pyfunction!(replay_trace, m)?)?;
    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_module(m)
}
