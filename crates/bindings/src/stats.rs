//! Cache statistics exposed to Python.

use cachesim::stats::CacheStats;
use crate::conversion::to_py_err;
use pyo3::prelude::*;

/// Read-only snapshot of the verification counters.
#[pyclass(name = "Stats", frozen)]
#[derive(Clone)]
pub struct PyStats {
    #[pyo3(get)]
    pub hits: u64,
    #[pyo3(get)]
    pub misses: u64,
    #[pyo3(get)]
    pub evictions: u64,
    #[pyo3(get)]
    pub dirty_bytes_in_cache: u64,
    #[pyo3(get)]
    pub dirty_bytes_evicted: u64,
}

impl From<CacheStats> for PyStats {
    fn from(s: CacheStats) -> Self {
        Self {
            hits: s.hits,
            misses: s.misses,
            evictions: s.evictions,
            dirty_bytes_in_cache: s.dirty_bytes_in_cache,
            dirty_bytes_evicted: s.dirty_bytes_evicted,
        }
    }
}

impl From<&PyStats> for CacheStats {
    fn from(s: &PyStats) -> Self {
        Self {
            hits: s.hits,
            misses: s.misses,
            evictions: s.evictions,
            dirty_bytes_in_cache: s.dirty_bytes_in_cache,
            dirty_bytes_evicted: s.dirty_bytes_evicted,
        }
    }
}

#[pymethods]
impl PyStats {
    /// The counters as a JSON object, as printed by `cachesim --json`.
    fn to_json(&self) -> PyResult<String> {
        CacheStats::from(self).to_json().map_err(to_py_err)
    }

    /// The summary line printed by reference cache simulators.
    fn __str__(&self) -> String {
        CacheStats::from(self).to_string()
    }

    fn __repr__(&self) -> String {
        format!("Stats({})", self.__str__())
    }
}
