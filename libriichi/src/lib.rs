#[macro_use]
pub mod macros;

pub mod algo;
pub mod engine;
pub mod hand;
pub mod mjai;
pub mod obs;
pub mod py_helper;
pub mod rankings;
pub mod state;
pub mod tile;

use pyo3::prelude::*;

/// The `riichi` Python extension module (only built with the `pymod`
/// feature; the `rlib`/`cdylib` target is also consumed directly from Rust,
/// e.g. by the CLI).
#[pymodule]
fn riichi(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    let prefix = "riichi";
    state::register_module(py, prefix, m)?;
    mjai::register_module(py, prefix, m)?;
    obs::register_module(py, prefix, m)?;
    engine::register_module(py, prefix, m)?;
    Ok(())
}
