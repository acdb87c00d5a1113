pub mod event;

pub use event::Event;

use crate::py_helper::add_submodule;
use pyo3::prelude::*;

pub fn register_module(
    py: Python<'_>,
    prefix: &str,
    super_mod: &Bound<'_, PyModule>,
) -> PyResult<()> {
    let m = PyModule::new(py, "mjai")?;
    add_submodule(py, prefix, super_mod, &m)
}
