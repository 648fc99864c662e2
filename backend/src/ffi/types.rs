//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::models::grid::{Cell, SeedingPolicy};
use crate::models::state::GridSnapshot;
use crate::orchestrator::{RunReport, SimulationConfig, TickResult};
use crate::stats::WealthStatistics;
use crate::tax::TaxPolicy;

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

fn parse_tax_policy(name: &str) -> PyResult<TaxPolicy> {
    match name {
        "flat" => Ok(TaxPolicy::Flat),
        "upper_bracket" | "upper" => Ok(TaxPolicy::UpperBracket),
        other => Err(PyValueError::new_err(format!(
            "Unknown tax_policy '{}' (expected 'flat' or 'upper_bracket')",
            other
        ))),
    }
}

fn parse_seeding_policy(name: &str) -> PyResult<SeedingPolicy> {
    match name {
        "fixed_draws" => Ok(SeedingPolicy::FixedDraws),
        "exact_count" => Ok(SeedingPolicy::ExactCount),
        other => Err(PyValueError::new_err(format!(
            "Unknown seeding_policy '{}' (expected 'fixed_draws' or 'exact_count')",
            other
        ))),
    }
}

/// Convert Python dict to SimulationConfig. Missing keys take defaults.
///
/// # Errors
///
/// Returns PyErr if a value has the wrong type or names an unknown policy.
/// Range checks happen when the orchestrator is built.
pub fn parse_simulation_config(py_config: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let d = SimulationConfig::default();

    let tax_policy: String = extract_with_default(py_config, "tax_policy", d.tax_policy.to_string())?;
    let seeding_policy: Option<String> = extract_with_default(py_config, "seeding_policy", None)?;

    Ok(SimulationConfig {
        grid_width: extract_with_default(py_config, "grid_width", d.grid_width)?,
        grid_height: extract_with_default(py_config, "grid_height", d.grid_height)?,
        resource_fraction: extract_with_default(py_config, "resource_fraction", d.resource_fraction)?,
        tick_budget: extract_with_default(py_config, "tick_budget", d.tick_budget)?,
        agent_count: extract_with_default(py_config, "agent_count", d.agent_count)?,
        tax_interval: extract_with_default(py_config, "tax_interval", d.tax_interval)?,
        tax_policy: parse_tax_policy(&tax_policy)?,
        tax_rate: extract_with_default(py_config, "tax_rate", d.tax_rate)?,
        upper_rate: extract_with_default(py_config, "upper_rate", d.upper_rate)?,
        rng_seed: extract_with_default(py_config, "rng_seed", d.rng_seed)?,
        seeding_policy: match seeding_policy {
            Some(name) => parse_seeding_policy(&name)?,
            None => d.seeding_policy,
        },
        record_movement: extract_with_default(py_config, "record_movement", d.record_movement)?,
    })
}

/// Convert TickResult to Python dict
pub fn tick_result_to_py<'py>(py: Python<'py>, result: &TickResult) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("tick", result.tick)?;
    dict.set_item("num_collected", result.num_collected)?;
    dict.set_item("num_moved", result.num_moved)?;
    dict.set_item("num_blocked", result.num_blocked)?;
    dict.set_item("remaining_units", result.remaining_units)?;
    dict.set_item("total_wealth", result.total_wealth)?;

    match &result.tax_cycle {
        Some(cycle) => {
            let tax = PyDict::new(py);
            tax.set_item("policy", cycle.policy.to_string())?;
            tax.set_item("collected", cycle.collected)?;
            tax.set_item("shortfall", cycle.shortfall)?;
            tax.set_item("threshold", cycle.threshold)?;
            tax.set_item("upper_bracket_agents", cycle.upper_bracket_agents)?;
            tax.set_item("share", cycle.share)?;
            tax.set_item("residual", cycle.residual)?;
            dict.set_item("tax_cycle", tax)?;
        }
        None => dict.set_item("tax_cycle", py.None())?,
    }

    Ok(dict)
}

/// Convert WealthStatistics to Python dict
pub fn statistics_to_py<'py>(py: Python<'py>, stats: &WealthStatistics) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("count", stats.count)?;
    dict.set_item("total_wealth", stats.total_wealth)?;
    dict.set_item("mean", stats.mean)?;
    dict.set_item("standard_deviation", stats.standard_deviation)?;
    dict.set_item("median", stats.median)?;
    dict.set_item("min", stats.min)?;
    dict.set_item("max", stats.max)?;
    dict.set_item("first_quartile", stats.first_quartile)?;
    dict.set_item("third_quartile", stats.third_quartile)?;
    dict.set_item("below_median", stats.below_median)?;
    dict.set_item("above_median", stats.above_median)?;
    dict.set_item("below_first_quartile", stats.below_first_quartile)?;
    dict.set_item("above_third_quartile", stats.above_third_quartile)?;
    dict.set_item("gini", stats.gini)?;
    dict.set_item("textbook_gini", stats.textbook_gini)?;
    Ok(dict)
}

/// Convert RunReport to Python dict
pub fn run_report_to_py<'py>(py: Python<'py>, report: &RunReport) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("config_hash", &report.config_hash)?;
    dict.set_item("rng_seed", report.rng_seed)?;
    dict.set_item("ticks_run", report.ticks_run)?;
    dict.set_item("tax_cycles", report.tax_cycles)?;
    dict.set_item("initial_resource_units", report.initial_resource_units)?;
    dict.set_item("remaining_resource_units", report.remaining_resource_units)?;
    dict.set_item("collected_units", report.collected_units)?;
    dict.set_item("treasury_balance", report.treasury_balance)?;
    dict.set_item("wallets", PyList::new(py, &report.wallets)?)?;
    dict.set_item("statistics", statistics_to_py(py, &report.statistics)?)?;
    Ok(dict)
}

fn cells_to_py<'py>(py: Python<'py>, cells: &[Cell]) -> PyResult<Bound<'py, PyList>> {
    PyList::new(py, cells.iter().map(|c| (c.x, c.y)))
}

/// Convert GridSnapshot to Python dict of coordinate tuples
pub fn snapshot_to_py<'py>(py: Python<'py>, snapshot: &GridSnapshot) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("tick", snapshot.tick)?;
    dict.set_item("width", snapshot.width)?;
    dict.set_item("height", snapshot.height)?;
    dict.set_item("agent_positions", cells_to_py(py, &snapshot.agent_positions)?)?;
    dict.set_item("resource_cells", cells_to_py(py, &snapshot.resource_cells)?)?;
    Ok(dict)
}
