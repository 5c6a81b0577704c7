//! Python bindings.
//!
//! Inputs arrive as plain dicts and results leave as plain dicts, so the
//! front end never holds Rust objects between recomputes.

use eafcarbon_core::engine::calculate as calculate_emissions;
use eafcarbon_core::parameters::{IntensityInput, ProcessParameters};
use eafcarbon_core::report::ReportView;
use eafcarbon_core::session::Session;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;
use serde::Serialize;
use std::collections::HashMap;

fn to_python<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    pythonize::pythonize(py, value).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn parameters_from(parameters: Option<&Bound<'_, PyAny>>) -> PyResult<ProcessParameters> {
    match parameters {
        None => Ok(ProcessParameters::default()),
        Some(parameters) => pythonize::depythonize_bound::<ProcessParameters>(parameters.clone())
            .map_err(|e| PyValueError::new_err(e.to_string())),
    }
}

/// Calculate emissions; returns the full result as a dict.
#[pyfunction]
#[pyo3(signature = (intensities, parameters=None))]
fn calculate(
    py: Python<'_>,
    intensities: HashMap<String, f64>,
    parameters: Option<&Bound<'_, PyAny>>,
) -> PyResult<PyObject> {
    let parameters = parameters_from(parameters)?;
    let intensities: IntensityInput = intensities.into_iter().collect();
    to_python(py, &calculate_emissions(&parameters, &intensities))
}

/// Calculate emissions; returns the formatted report view as a dict.
#[pyfunction]
#[pyo3(signature = (intensities, parameters=None))]
fn report(
    py: Python<'_>,
    intensities: HashMap<String, f64>,
    parameters: Option<&Bound<'_, PyAny>>,
) -> PyResult<PyObject> {
    let parameters = parameters_from(parameters)?;
    let intensities: IntensityInput = intensities.into_iter().collect();
    to_python(
        py,
        &ReportView::new(&calculate_emissions(&parameters, &intensities)),
    )
}

/// User-editable intensity fields in display order.
#[pyfunction]
fn input_fields(py: Python<'_>) -> PyResult<PyObject> {
    to_python(py, &Session::new().intensity_fields())
}

#[pyfunction]
fn default_parameters(py: Python<'_>) -> PyResult<PyObject> {
    to_python(py, &ProcessParameters::default())
}

#[pymodule]
#[pyo3(name = "_lib")]
fn eafcarbon(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(calculate, m)?)?;
    m.add_function(wrap_pyfunction!(report, m)?)?;
    m.add_function(wrap_pyfunction!(input_fields, m)?)?;
    m.add_function(wrap_pyfunction!(default_parameters, m)?)?;
    Ok(())
}
