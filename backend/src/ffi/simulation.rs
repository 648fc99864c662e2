//! PyO3 wrapper for Orchestrator
//!
//! # Example (from Python)
//!
//! ```python
//! from wealth_simulator_core_rs import Simulation
//!
//! sim = Simulation.new({
//!     "grid_width": 100,
//!     "grid_height": 100,
//!     "agent_count": 300,
//!     "tick_budget": 3000,
//!     "tax_interval": 300,
//!     "tax_policy": "upper_bracket",
//!     "tax_rate": 0.0,
//!     "upper_rate": 0.2,
//! })
//! report = sim.run()
//! print(report["statistics"]["textbook_gini"])
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_simulation_config, run_report_to_py, snapshot_to_py, tick_result_to_py};
use crate::orchestrator::{Orchestrator, SimulationError};

fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::InvalidConfiguration(_) | SimulationError::Serialization(_) => {
            PyValueError::new_err(err.to_string())
        }
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Python wrapper for the Rust orchestrator
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: Orchestrator,
}

#[pymethods]
impl PySimulation {
    /// Create a simulation from a configuration dict
    ///
    /// Raises ValueError for missing/ill-typed fields or invalid ranges.
    #[staticmethod]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;
        let inner = Orchestrator::new(rust_config).map_err(to_py_err)?;
        Ok(PySimulation { inner })
    }

    /// Execute one tick and return its summary
    fn tick<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let result = self.inner.tick().map_err(to_py_err)?;
        tick_result_to_py(py, &result)
    }

    /// Execute the remaining ticks and return the run report
    fn run<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let report = self.inner.run().map_err(to_py_err)?;
        run_report_to_py(py, &report)
    }

    fn current_tick(&self) -> usize {
        self.inner.current_tick()
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Current wallets in agent order
    fn wallets(&self) -> Vec<f64> {
        self.inner.wallets()
    }

    fn treasury(&self) -> f64 {
        self.inner.tax_authority().treasury()
    }

    /// Agent positions and remaining resource cells, for plotting
    fn snapshot<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        snapshot_to_py(py, &self.inner.snapshot())
    }

    fn config_hash(&self) -> String {
        self.inner.config_hash().to_string()
    }
}
