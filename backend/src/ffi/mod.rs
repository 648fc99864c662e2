//! Python bindings (PyO3)
//!
//! Exposes a `Simulation` class so runs can be driven and analyzed from
//! Python. Only built with the `pyo3` feature.

pub mod simulation;
pub mod types;
