//! Wealth Simulator Core - Rust Engine
//!
//! Agent-based model of a minimal economy: foragers walk a bounded grid
//! collecting scarce resource units, a tax authority periodically taxes and
//! redistributes their wallets, and the run ends with wealth-inequality
//! statistics.
//!
//! # Architecture
//!
//! - **core**: Tick counting and tax cadence
//! - **models**: Domain types (ResourceGrid, Agent, Event, State)
//! - **tax**: Tax policies and the tax authority
//! - **stats**: Dispersion and Gini statistics over final wallets
//! - **orchestrator**: Main simulation loop
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (one seeded RNG per run)
//! 2. Wallets never go negative
//! 3. Every tax cycle empties the treasury it filled

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod stats;
pub mod tax;

// Re-exports for convenience
pub use crate::core::time::TimeManager;
pub use models::{
    agent::{Agent, AgentAction},
    event::{Event, EventLog},
    grid::{Cell, Direction, GridError, ResourceGrid, SeedingPolicy},
    state::{GridSnapshot, SimulationState, SnapshotSink},
};
pub use orchestrator::{
    config_fingerprint, Orchestrator, RunReport, SimulationConfig, SimulationError, TickResult,
};
pub use rng::RngManager;
pub use stats::{StatisticsError, WealthStatistics};
pub use tax::{TaxAuthority, TaxCycle, TaxError, TaxPolicy};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn wealth_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulation::PySimulation>()?;
    Ok(())
}
