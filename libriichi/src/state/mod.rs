pub mod action;
pub mod item;
pub mod player_state;
pub mod update;

use crate::py_helper::add_submodule;
pub use action::ActionCandidate;
pub use player_state::PlayerState;
use pyo3::prelude::*;

pub fn register_module(
    py: Python<'_>,
    prefix: &str,
    super_mod: &Bound<'_, PyModule>,
) -> PyResult<()> {
    let m = PyModule::new(py, "state")?;
    m.add_class::<ActionCandidate>()?;
    m.add_class::<PlayerState>()?;
    add_submodule(py, prefix, super_mod, &m)
}
