//! Simulation State
//!
//! Owns the resource grid and the agent population for one run.
//!
//! # Critical Invariants
//!
//! 1. **Positions In Bounds**: every agent position is a cell of the grid
//! 2. **No Regrowth**: the grid's unit count never increases during a run
//! 3. **Non-negative Wallets**: taxation clips wallets at zero

use serde::{Deserialize, Serialize};

use crate::models::agent::Agent;
use crate::models::grid::{Cell, ResourceGrid};

/// Grid and population state
///
/// # Example
///
/// ```rust
/// use wealth_simulator_core_rs::{Agent, Cell, ResourceGrid, SimulationState};
///
/// let grid = ResourceGrid::empty(10, 10).unwrap();
/// let agents = vec![Agent::new(0, Cell::new(0, 0)), Agent::new(1, Cell::new(9, 9))];
///
/// let state = SimulationState::new(grid, agents);
/// assert_eq!(state.num_agents(), 2);
/// assert_eq!(state.total_wealth(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    grid: ResourceGrid,
    /// Agents in pass order. Earlier agents probe shared cells first.
    agents: Vec<Agent>,
}

impl SimulationState {
    pub fn new(grid: ResourceGrid, agents: Vec<Agent>) -> Self {
        Self { grid, agents }
    }

    pub fn grid(&self) -> &ResourceGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ResourceGrid {
        &mut self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Borrow grid and agents mutably at the same time
    pub fn split_mut(&mut self) -> (&mut ResourceGrid, &mut [Agent]) {
        (&mut self.grid, &mut self.agents)
    }

    pub fn get_agent(&self, id: usize) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    /// Wallet values in agent order
    pub fn wallets(&self) -> Vec<f64> {
        self.agents.iter().map(Agent::wallet).collect()
    }

    /// Sum of all wallets
    pub fn total_wealth(&self) -> f64 {
        self.agents.iter().map(Agent::wallet).sum()
    }

    /// Agent positions in agent order
    pub fn agent_positions(&self) -> Vec<Cell> {
        self.agents.iter().map(Agent::position).collect()
    }

    /// Capture what a renderer needs to draw the current tick
    pub fn snapshot(&self, tick: usize) -> GridSnapshot {
        GridSnapshot {
            tick,
            width: self.grid.width(),
            height: self.grid.height(),
            agent_positions: self.agent_positions(),
            resource_cells: self.grid.resource_cells(),
        }
    }
}

/// Positions of agents and remaining units at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub tick: usize,
    pub width: usize,
    pub height: usize,
    pub agent_positions: Vec<Cell>,
    pub resource_cells: Vec<Cell>,
}

/// Consumer of grid snapshots (plotters, recorders)
///
/// The core never renders anything itself; a sink decides what
/// `destination` means (a file name, a frame index, a channel).
pub trait SnapshotSink {
    type Error;

    fn consume(&mut self, snapshot: &GridSnapshot, destination: &str) -> Result<(), Self::Error>;
}
