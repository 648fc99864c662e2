//! Resource grid model
//!
//! A bounded `width × height` field of cells, each either empty or holding
//! exactly one resource unit ("gold"). The grid is seeded once at the start
//! of a run and only ever loses units afterwards: agents deplete cells, and
//! nothing regrows.
//!
//! Storage is a dense row-major `Vec<bool>`, so every coordinate in
//! `[0, width) × [0, height)` has exactly one slot and any coordinate outside
//! that range is rejected with [`GridError::OutOfBounds`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::RngManager;

/// Errors raised by grid construction and coordinate access
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("Fill fraction must be within [0, 1], got {fraction}")]
    InvalidFillFraction { fraction: f64 },
}

/// A grid coordinate. `x` grows east, `y` grows north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four grid-aligned headings an agent can move in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Scan order used when collecting move candidates
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
}

/// How the initial resource units are scattered
///
/// Both policies target `ceil(fill_fraction × width × height)` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingPolicy {
    /// Make exactly the target number of uniform draws. Draws landing on an
    /// already-seeded cell are wasted, so the realized count can fall short.
    #[default]
    FixedDraws,

    /// Keep drawing until the target number of distinct cells hold a unit.
    ExactCount,
}

/// Cell occupancy for one run
///
/// # Example
/// ```
/// use wealth_simulator_core_rs::{Cell, ResourceGrid};
///
/// let mut grid = ResourceGrid::empty(2, 2).unwrap();
/// grid.place(Cell::new(1, 1)).unwrap();
/// assert_eq!(grid.total_resource_units(), 1);
///
/// assert!(grid.deplete(Cell::new(1, 1)).unwrap());
/// assert!(!grid.deplete(Cell::new(1, 1)).unwrap()); // already empty: no-op
/// assert!(grid.is_occupied(Cell::new(2, 0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGrid {
    width: usize,
    height: usize,
    /// Target share of cells seeded at construction (0.0 for hand-built grids)
    fill_fraction: f64,
    /// Row-major occupancy: index = y * width + x
    occupancy: Vec<bool>,
}

impl ResourceGrid {
    /// Create a grid with every cell empty
    pub fn empty(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            fill_fraction: 0.0,
            occupancy: vec![false; width * height],
        })
    }

    /// Create a grid and scatter resource units over it
    pub fn seeded(
        width: usize,
        height: usize,
        fill_fraction: f64,
        policy: SeedingPolicy,
        rng: &mut RngManager,
    ) -> Result<Self, GridError> {
        let mut grid = Self::empty(width, height)?;
        grid.scatter(fill_fraction, policy, rng)?;
        Ok(grid)
    }

    /// Scatter resource units with uniform random draws
    ///
    /// The draw target is `ceil(fill_fraction × width × height)`; see
    /// [`SeedingPolicy`] for how collisions are treated. Returns the number
    /// of units the grid holds afterwards.
    pub fn scatter(
        &mut self,
        fill_fraction: f64,
        policy: SeedingPolicy,
        rng: &mut RngManager,
    ) -> Result<usize, GridError> {
        if !(0.0..=1.0).contains(&fill_fraction) {
            return Err(GridError::InvalidFillFraction {
                fraction: fill_fraction,
            });
        }
        self.fill_fraction = fill_fraction;

        let cells = self.cell_count();
        let target = ((fill_fraction * cells as f64).ceil() as usize).min(cells);

        match policy {
            SeedingPolicy::FixedDraws => {
                for _ in 0..target {
                    let i = self.random_index(rng);
                    self.occupancy[i] = true;
                }
            }
            SeedingPolicy::ExactCount => {
                let mut seeded = 0;
                while seeded < target {
                    let i = self.random_index(rng);
                    if !self.occupancy[i] {
                        self.occupancy[i] = true;
                        seeded += 1;
                    }
                }
            }
        }

        Ok(self.total_resource_units())
    }

    fn random_index(&self, rng: &mut RngManager) -> usize {
        let x = rng.index(self.width);
        let y = rng.index(self.height);
        y * self.width + x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fill_fraction(&self) -> f64 {
        self.fill_fraction
    }

    pub fn cell_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Whether `cell` lies inside `[0, width) × [0, height)`
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    fn index_of(&self, cell: Cell) -> Result<usize, GridError> {
        if self.contains(cell) {
            Ok(cell.y * self.width + cell.x)
        } else {
            Err(GridError::OutOfBounds {
                x: cell.x,
                y: cell.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Whether `cell` currently holds a resource unit
    pub fn is_occupied(&self, cell: Cell) -> Result<bool, GridError> {
        let i = self.index_of(cell)?;
        Ok(self.occupancy[i])
    }

    /// Empty `cell`. Returns `true` if a unit was removed, `false` if the
    /// cell was already empty.
    pub fn deplete(&mut self, cell: Cell) -> Result<bool, GridError> {
        let i = self.index_of(cell)?;
        let had_unit = self.occupancy[i];
        self.occupancy[i] = false;
        Ok(had_unit)
    }

    /// Put a unit on `cell`. Returns `false` if one was already there.
    ///
    /// Used for hand-built scenarios; the simulation never regrows cells.
    pub fn place(&mut self, cell: Cell) -> Result<bool, GridError> {
        let i = self.index_of(cell)?;
        let was_empty = !self.occupancy[i];
        self.occupancy[i] = true;
        Ok(was_empty)
    }

    /// Number of cells currently holding a unit
    pub fn total_resource_units(&self) -> usize {
        self.occupancy.iter().filter(|&&held| held).count()
    }

    /// The in-bounds cell one step from `cell` in `direction`, if any
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        if !self.contains(cell) {
            return None;
        }
        let next = match direction {
            Direction::North => Cell::new(cell.x, cell.y.checked_add(1)?),
            Direction::South => Cell::new(cell.x, cell.y.checked_sub(1)?),
            Direction::East => Cell::new(cell.x.checked_add(1)?, cell.y),
            Direction::West => Cell::new(cell.x.checked_sub(1)?, cell.y),
        };
        self.contains(next).then_some(next)
    }

    /// Every coordinate with its occupancy, row by row from `y = 0`
    pub fn cells(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        let width = self.width;
        self.occupancy
            .iter()
            .enumerate()
            .map(move |(i, &held)| (Cell::new(i % width, i / width), held))
    }

    /// Coordinates of every cell still holding a unit
    pub fn resource_cells(&self) -> Vec<Cell> {
        self.cells()
            .filter(|(_, held)| *held)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Uniformly random in-bounds coordinate
    pub fn random_cell(&self, rng: &mut RngManager) -> Cell {
        let x = rng.index(self.width);
        let y = rng.index(self.height);
        Cell::new(x, y)
    }
}
