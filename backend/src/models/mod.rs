//! Domain models for the wealth simulator

pub mod agent;
pub mod event;
pub mod grid;
pub mod state;

// Re-exports
pub use agent::{Agent, AgentAction};
pub use event::{Event, EventLog};
pub use grid::{Cell, Direction, GridError, ResourceGrid, SeedingPolicy};
pub use state::{GridSnapshot, SimulationState, SnapshotSink};
