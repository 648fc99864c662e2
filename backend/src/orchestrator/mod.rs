//! Orchestrator - main simulation loop
//!
//! Owns the grid, the agents, the tax authority and the RNG for one run and
//! advances them tick by tick. See `engine.rs` for the loop itself.

pub mod engine;
pub mod fingerprint;

pub use engine::{Orchestrator, RunReport, SimulationConfig, SimulationError, TickResult};
pub use fingerprint::config_fingerprint;
