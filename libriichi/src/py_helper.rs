//! Small helper for registering a nested module under `sys.modules`, needed
//! because pyo3 does not do this automatically for submodules created with
//! `PyModule::new`.

use pyo3::prelude::*;
use pyo3::types::PyDict;

pub fn add_submodule(
    py: Python<'_>,
    prefix: &str,
    super_mod: &Bound<'_, PyModule>,
    sub_mod: &Bound<'_, PyModule>,
) -> PyResult<()> {
    let full_name = format!("{prefix}.{}", sub_mod.name()?);
    let sys_modules = py
        .import("sys")?
        .getattr("modules")?
        .downcast_into::<PyDict>()?;
    sys_modules.set_item(&full_name, sub_mod)?;
    super_mod.add_submodule(sub_mod)?;
    Ok(())
}
