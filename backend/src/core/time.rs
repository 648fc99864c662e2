//! Time management for the simulation
//!
//! The simulation runs for a fixed budget of discrete ticks. Ticks are
//! numbered from 1: the counter starts at 0 and is advanced before each
//! agent pass, so the first pass runs as tick 1 and the last as
//! `tick_budget`. Every `tax_interval`-th tick closes with a tax cycle.

use serde::{Deserialize, Serialize};

/// Tick counter with a fixed budget and a tax cadence
///
/// # Example
/// ```
/// use wealth_simulator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new(50, 25);
/// assert_eq!(time.current_tick(), 0);
///
/// time.advance_tick();
/// assert_eq!(time.current_tick(), 1);
/// assert!(!time.is_tax_tick());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeManager {
    /// Ticks completed (or in progress) since the run started
    current_tick: usize,
    /// Total number of ticks the run may execute
    tick_budget: usize,
    /// Tax cycle cadence in ticks
    tax_interval: usize,
}

impl TimeManager {
    /// Create a new TimeManager
    ///
    /// # Panics
    /// Panics if `tax_interval` is zero. Callers validate configuration first.
    pub fn new(tick_budget: usize, tax_interval: usize) -> Self {
        assert!(tax_interval > 0, "tax_interval must be positive");
        Self {
            current_tick: 0,
            tick_budget,
            tax_interval,
        }
    }

    /// Advance time by one tick and return the new tick number
    pub fn advance_tick(&mut self) -> usize {
        self.current_tick += 1;
        self.current_tick
    }

    /// Get the current tick (0 before the first pass)
    pub fn current_tick(&self) -> usize {
        self.current_tick
    }

    /// Whether the current tick closes with a tax cycle
    ///
    /// # Example
    /// ```
    /// use wealth_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new(10, 5);
    /// let mut taxed = Vec::new();
    /// while !time.is_finished() {
    ///     let tick = time.advance_tick();
    ///     if time.is_tax_tick() {
    ///         taxed.push(tick);
    ///     }
    /// }
    /// assert_eq!(taxed, vec![5, 10]);
    /// ```
    pub fn is_tax_tick(&self) -> bool {
        self.current_tick > 0 && self.current_tick % self.tax_interval == 0
    }

    /// True once the whole budget has been spent
    pub fn is_finished(&self) -> bool {
        self.current_tick >= self.tick_budget
    }

    /// Ticks left in the budget
    pub fn remaining_ticks(&self) -> usize {
        self.tick_budget.saturating_sub(self.current_tick)
    }

    pub fn tick_budget(&self) -> usize {
        self.tick_budget
    }

    pub fn tax_interval(&self) -> usize {
        self.tax_interval
    }
}
