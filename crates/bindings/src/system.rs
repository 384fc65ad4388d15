//! Memory system Python binding.
//!
//! Wraps the core `System`: byte, word and instruction accessors routed
//! through the SRAM cache, plus flush, counters and a cache dump.

use crate::conversion::{parse_config, to_py_err};
use crate::stats::PyStats;
use cachesim::System;
use cachesim::stats::{NoProbe, VerificationProbe};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

/// Python-exposed memory system: one SRAM cache in front of one DRAM.
#[pyclass(name = "MemorySystem", unsendable)]
pub struct PyMemorySystem {
    pub inner: System,
}

#[pymethods]
impl PyMemorySystem {
    /// Creates a memory system.
    ///
    /// # Arguments
    /// * `config_json` - Optional JSON configuration; missing fields take defaults.
    /// * `verify` - Keep hit/miss/eviction counters and the last outcome tag.
    ///
    /// # Errors
    /// Raises `ValueError` if the configuration cannot be parsed or built.
    #[new]
    #[pyo3(signature = (config_json=None, verify=true))]
    fn new(config_json: Option<&str>, verify: bool) -> PyResult<Self> {
        let config = parse_config(config_json)?;
        let inner = if verify {
            System::with_probe(&config, Box::new(VerificationProbe::new()))
        } else {
            System::with_probe(&config, Box::new(NoProbe))
        }
        .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    pub fn read_byte(&mut self, paddr: u64) -> PyResult<u8> {
        self.inner.read_byte(paddr).map_err(to_py_err)
    }

    pub fn write_byte(&mut self, paddr: u64, value: u8) -> PyResult<()> {
        self.inner.write_byte(paddr, value).map_err(to_py_err)
    }

    pub fn read_u64(&mut self, paddr: u64) -> PyResult<u64> {
        self.inner.read_u64(paddr).map_err(to_py_err)
    }

    pub fn write_u64(&mut self, paddr: u64, value: u64) -> PyResult<()> {
        self.inner.write_u64(paddr, value).map_err(to_py_err)
    }

    /// Returns the full fixed-length instruction buffer as `bytes`.
    pub fn read_instruction<'py>(
        &mut self,
        py: Python<'py>,
        paddr: u64,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let raw = self.inner.read_instruction(paddr).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &raw))
    }

    /// Writes `text` zero-padded to the instruction buffer length.
    ///
    /// # Errors
    /// Raises `ValueError` if `text` does not leave room for padding.
    pub fn write_instruction(&mut self, paddr: u64, text: &str) -> PyResult<()> {
        self.inner.write_instruction(paddr, text).map_err(to_py_err)
    }

    /// Copies `data` into DRAM at `paddr`, dropping stale cached copies.
    pub fn load(&mut self, data: &[u8], paddr: u64) -> PyResult<()> {
        self.inner.load_binary_at(data, paddr).map_err(to_py_err)
    }

    /// Writes every dirty line back; returns the number of lines written.
    pub fn flush(&mut self) -> PyResult<usize> {
        self.inner.flush().map_err(to_py_err)
    }

    /// Counters, or None when built with `verify=False`.
    pub fn stats(&self) -> Option<PyStats> {
        self.inner.stats().map(PyStats::from)
    }

    /// `"hit"`, `"miss"` or `"miss eviction"` for the most recent access.
    pub fn last_outcome(&self) -> Option<&'static str> {
        self.inner.last_outcome().map(|o| o.as_str())
    }

    /// One line per set: `set 0: [ (tag: state, recency), ... ]`.
    pub fn dump(&self) -> String {
        self.inner.cache.to_string()
    }

    /// Raw DRAM contents, bypassing the cache.
    pub fn dram<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new(py, self.inner.dram.as_bytes())
    }
}
