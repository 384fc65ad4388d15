//! Conversions between Python values and simulator types.

use cachesim::config::Config;
use cachesim::MemError;
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

/// Parses an optional JSON configuration, falling back to defaults.
pub fn parse_config(config_json: Option<&str>) -> PyResult<Config> {
    match config_json {
        Some(text) => Config::from_json(text).map_err(to_py_err),
        None => Ok(Config::default()),
    }
}

/// Maps bounds violations to `IndexError` and everything else to `ValueError`.
pub fn to_py_err(err: MemError) -> PyErr {
    if err.is_out_of_range() {
        PyIndexError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}
