//! Agent (forager) model
//!
//! Each agent has a position on the grid and a private wallet. Agents are
//! purely reactive: every tick they look at the cell they stand on, collect
//! the unit if there is one, and otherwise take one step in a direction
//! picked from the in-bounds neighbors. They cannot see whether a neighbor
//! holds a unit before stepping onto it.
//!
//! Agents never interact directly. Several agents may share a cell; the
//! first one to probe an occupied cell within a tick takes the unit.

use serde::{Deserialize, Serialize};

use crate::models::grid::{Cell, Direction, GridError, ResourceGrid};
use crate::rng::RngManager;

/// What an agent did during one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentAction {
    /// Picked up the unit on its own cell
    Collected { cell: Cell },

    /// Stepped to a neighboring cell
    Moved {
        from: Cell,
        to: Cell,
        direction: Direction,
    },

    /// Chose a direction that would leave the grid and stayed put
    Blocked { at: Cell, direction: Direction },
}

/// A single forager
///
/// # Example
/// ```
/// use wealth_simulator_core_rs::{Agent, Cell};
///
/// let mut agent = Agent::new(0, Cell::new(3, 4));
/// agent.credit(10.0);
///
/// // Deducting more than the wallet holds clips at zero and reports the shortfall
/// let shortfall = agent.deduct(12.5);
/// assert_eq!(agent.wallet(), 0.0);
/// assert_eq!(shortfall, 2.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Index of the agent in the population
    id: usize,

    /// Current cell
    position: Cell,

    /// Accumulated wealth. Never negative.
    wallet: f64,
}

impl Agent {
    /// Create an agent with an empty wallet at `position`
    pub fn new(id: usize, position: Cell) -> Self {
        Self {
            id,
            position,
            wallet: 0.0,
        }
    }

    /// Create an agent at a uniformly random cell of `grid`
    pub fn spawn(id: usize, grid: &ResourceGrid, rng: &mut RngManager) -> Self {
        Self::new(id, grid.random_cell(rng))
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn wallet(&self) -> f64 {
        self.wallet
    }

    /// Add `amount` to the wallet and return the amount added
    pub fn credit(&mut self, amount: f64) -> f64 {
        self.wallet += amount;
        amount
    }

    /// Remove `amount` from the wallet, clipping at zero
    ///
    /// Returns the part of `amount` that could not be taken.
    pub fn deduct(&mut self, amount: f64) -> f64 {
        self.wallet -= amount;
        if self.wallet < 0.0 {
            let shortfall = -self.wallet;
            self.wallet = 0.0;
            shortfall
        } else {
            0.0
        }
    }

    /// Directions whose target cell lies inside the grid, in scan order
    /// (north, south, east, west). Occupancy is not considered.
    pub fn candidate_moves(&self, grid: &ResourceGrid) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| grid.neighbor(self.position, d).is_some())
            .collect()
    }

    /// Pick the direction for this tick's step
    ///
    /// A single candidate is taken without consuming randomness. With no
    /// candidates at all (a 1x1 grid) any of the four headings is drawn, and
    /// the resulting move will be blocked.
    pub fn decide(&self, grid: &ResourceGrid, rng: &mut RngManager) -> Direction {
        let candidates = self.candidate_moves(grid);
        match candidates.as_slice() {
            [only] => *only,
            [] => Direction::ALL[rng.index(Direction::ALL.len())],
            many => many[rng.index(many.len())],
        }
    }

    /// Step one cell in `direction` if that keeps the agent on the grid
    ///
    /// Returns whether the position changed.
    pub fn move_in(&mut self, direction: Direction, grid: &ResourceGrid) -> bool {
        match grid.neighbor(self.position, direction) {
            Some(next) => {
                self.position = next;
                true
            }
            None => false,
        }
    }

    /// Run one tick of the probe / collect / scan / move cycle
    pub fn step(
        &mut self,
        grid: &mut ResourceGrid,
        rng: &mut RngManager,
    ) -> Result<AgentAction, GridError> {
        let here = self.position;

        if grid.is_occupied(here)? {
            grid.deplete(here)?;
            self.wallet += 1.0;
            return Ok(AgentAction::Collected { cell: here });
        }

        let direction = self.decide(grid, rng);
        if self.move_in(direction, grid) {
            Ok(AgentAction::Moved {
                from: here,
                to: self.position,
                direction,
            })
        } else {
            Ok(AgentAction::Blocked {
                at: here,
                direction,
            })
        }
    }
}
