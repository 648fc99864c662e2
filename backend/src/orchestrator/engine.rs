//! Orchestrator Engine
//!
//! Main simulation loop tying together the grid, the agents and the tax
//! authority.
//!
//! # Architecture
//!
//! ```text
//! Setup (in RNG draw order):
//! 1. Spawn agents at uniformly random cells
//! 2. Scatter resource units over the grid
//!
//! For each tick t = 1..=tick_budget:
//! 1. Every agent, in order, probes its cell: collect, or step
//! 2. If t % tax_interval == 0: assess every wallet, then redistribute
//! 3. Log events
//!
//! After the last tick:
//! - Compute wealth statistics from the final wallets
//! ```
//!
//! # Example
//!
//! ```rust
//! use wealth_simulator_core_rs::{Orchestrator, SimulationConfig, TaxPolicy};
//!
//! let config = SimulationConfig {
//!     grid_width: 10,
//!     grid_height: 10,
//!     resource_fraction: 0.5,
//!     agent_count: 5,
//!     tick_budget: 50,
//!     tax_interval: 25,
//!     tax_policy: TaxPolicy::Flat,
//!     tax_rate: 0.1,
//!     rng_seed: 12345,
//!     ..SimulationConfig::default()
//! };
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! orchestrator.run_to_completion().unwrap();
//!
//! assert_eq!(orchestrator.current_tick(), 50);
//! assert!(orchestrator.state().total_wealth() <= 50.0 + 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::fingerprint::config_fingerprint;
use crate::core::time::TimeManager;
use crate::models::agent::{Agent, AgentAction};
use crate::models::event::{Event, EventLog};
use crate::models::grid::{GridError, ResourceGrid, SeedingPolicy};
use crate::models::state::{GridSnapshot, SimulationState, SnapshotSink};
use crate::rng::RngManager;
use crate::stats::{StatisticsError, WealthStatistics};
use crate::tax::{TaxAuthority, TaxCycle, TaxError, TaxPolicy};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete run configuration
///
/// Defaults reproduce the reference economy: a 100x100 grid 40% covered,
/// 300 agents over 3000 ticks, a flat 10% tax every 300 ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub grid_width: usize,
    pub grid_height: usize,

    /// Target share of cells seeded with a unit, in [0, 1]
    pub resource_fraction: f64,

    /// Number of ticks the run executes
    pub tick_budget: usize,

    pub agent_count: usize,

    /// A tax cycle closes every tick divisible by this
    pub tax_interval: usize,

    pub tax_policy: TaxPolicy,

    /// Base rate, in [0, 1]
    pub tax_rate: f64,

    /// Rate for the upper bracket, in [0, 1]. Ignored by the flat policy.
    pub upper_rate: f64,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,

    pub seeding_policy: SeedingPolicy,

    /// Log a `Moved`/`Blocked` event for every agent step
    pub record_movement: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_width: 100,
            grid_height: 100,
            resource_fraction: 0.4,
            tick_budget: 3000,
            agent_count: 300,
            tax_interval: 300,
            tax_policy: TaxPolicy::Flat,
            tax_rate: 0.10,
            upper_rate: 0.20,
            rng_seed: 12345,
            seeding_policy: SeedingPolicy::FixedDraws,
            record_movement: false,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::Serialization(format!("invalid config JSON: {}", e)))
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = [
            ("grid_width", self.grid_width),
            ("grid_height", self.grid_height),
            ("tick_budget", self.tick_budget),
            ("agent_count", self.agent_count),
            ("tax_interval", self.tax_interval),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{} must be > 0",
                    name
                )));
            }
        }

        let fractions = [
            ("resource_fraction", self.resource_fraction),
            ("tax_rate", self.tax_rate),
            ("upper_rate", self.upper_rate),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.tax_interval > self.tick_budget {
            return Err(SimulationError::InvalidConfiguration(format!(
                "tax_interval ({}) exceeds tick_budget ({}); no tax cycle would run",
                self.tax_interval, self.tick_budget
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Statistics error: {0}")]
    Statistics(#[from] StatisticsError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Run already completed all {tick_budget} ticks")]
    BudgetExhausted { tick_budget: usize },
}

impl From<TaxError> for SimulationError {
    fn from(err: TaxError) -> Self {
        SimulationError::InvalidConfiguration(err.to_string())
    }
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    /// Tick number (1-based)
    pub tick: usize,

    /// Units picked up this tick
    pub num_collected: usize,

    /// Agents that changed cell
    pub num_moved: usize,

    /// Agents whose chosen direction led off the grid
    pub num_blocked: usize,

    /// The tax cycle that closed this tick, if any
    pub tax_cycle: Option<TaxCycle>,

    /// Units still on the grid after the tick
    pub remaining_units: usize,

    /// Sum of all wallets after the tick
    pub total_wealth: f64,
}

/// Everything a reporting consumer needs about a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Fingerprint of the configuration that produced this run
    pub config_hash: String,
    pub rng_seed: u64,
    pub ticks_run: usize,
    pub tax_cycles: usize,
    pub initial_resource_units: usize,
    pub remaining_resource_units: usize,
    pub collected_units: usize,
    /// Treasury left over after the last cycle
    pub treasury_balance: f64,
    /// Final wallets in agent order
    pub wallets: Vec<f64>,
    pub statistics: WealthStatistics,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator managing simulation state and the tick loop
///
/// # Determinism
///
/// All randomness is via `rng_manager` with seeded xorshift64*.
/// Same config (seed included) = identical results.
pub struct Orchestrator {
    config: SimulationConfig,

    /// Grid and agents
    state: SimulationState,

    time_manager: TimeManager,

    rng_manager: RngManager,

    tax_authority: TaxAuthority,

    event_log: EventLog,

    initial_resource_units: usize,

    collected_units: usize,

    tax_cycles: usize,

    config_hash: String,
}

impl Orchestrator {
    /// Create a new orchestrator with a freshly spawned population and grid
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng_manager = RngManager::new(config.rng_seed);

        let mut grid = ResourceGrid::empty(config.grid_width, config.grid_height)?;
        let agents: Vec<Agent> = (0..config.agent_count)
            .map(|id| Agent::spawn(id, &grid, &mut rng_manager))
            .collect();
        grid.scatter(config.resource_fraction, config.seeding_policy, &mut rng_manager)?;

        Self::assemble(config, SimulationState::new(grid, agents), rng_manager)
    }

    /// Create an orchestrator over a hand-built grid and population
    ///
    /// The state must match the configuration's grid size and agent count,
    /// and every agent must stand on the grid. `resource_fraction` and
    /// `seeding_policy` are not used.
    pub fn from_state(
        config: SimulationConfig,
        state: SimulationState,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let grid = state.grid();
        if grid.width() != config.grid_width || grid.height() != config.grid_height {
            return Err(SimulationError::InvalidConfiguration(format!(
                "grid is {}x{} but config says {}x{}",
                grid.width(),
                grid.height(),
                config.grid_width,
                config.grid_height
            )));
        }
        if state.num_agents() != config.agent_count {
            return Err(SimulationError::InvalidConfiguration(format!(
                "state has {} agents but config says {}",
                state.num_agents(),
                config.agent_count
            )));
        }
        for agent in state.agents() {
            grid.is_occupied(agent.position())?;
        }

        let rng_manager = RngManager::new(config.rng_seed);
        Self::assemble(config, state, rng_manager)
    }

    fn assemble(
        config: SimulationConfig,
        state: SimulationState,
        rng_manager: RngManager,
    ) -> Result<Self, SimulationError> {
        let tax_authority = TaxAuthority::new(
            config.tax_policy,
            config.tax_rate,
            config.upper_rate,
            config.agent_count,
        )?;
        let time_manager = TimeManager::new(config.tick_budget, config.tax_interval);
        let config_hash = config_fingerprint(&config)?;
        let initial_resource_units = state.grid().total_resource_units();

        info!(
            width = config.grid_width,
            height = config.grid_height,
            agents = config.agent_count,
            initial_resource_units,
            policy = %config.tax_policy,
            seed = config.rng_seed,
            "Simulation initialized"
        );

        Ok(Self {
            config,
            state,
            time_manager,
            rng_manager,
            tax_authority,
            event_log: EventLog::new(),
            initial_resource_units,
            collected_units: 0,
            tax_cycles: 0,
            config_hash,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get current tick number (0 before the first tick)
    pub fn current_tick(&self) -> usize {
        self.time_manager.current_tick()
    }

    pub fn is_finished(&self) -> bool {
        self.time_manager.is_finished()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tax_authority(&self) -> &TaxAuthority {
        &self.tax_authority
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn initial_resource_units(&self) -> usize {
        self.initial_resource_units
    }

    pub fn collected_units(&self) -> usize {
        self.collected_units
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Final (or current) wallets in agent order
    pub fn wallets(&self) -> Vec<f64> {
        self.state.wallets()
    }

    /// Grid snapshot for the current tick
    pub fn snapshot(&self) -> GridSnapshot {
        self.state.snapshot(self.current_tick())
    }

    /// Hand the current snapshot to a renderer
    pub fn render_to<S: SnapshotSink>(&self, sink: &mut S, destination: &str) -> Result<(), S::Error> {
        sink.consume(&self.snapshot(), destination)
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick
    pub fn tick(&mut self) -> Result<TickResult, SimulationError> {
        if self.time_manager.is_finished() {
            return Err(SimulationError::BudgetExhausted {
                tick_budget: self.time_manager.tick_budget(),
            });
        }

        let tick = self.time_manager.advance_tick();
        let record_movement = self.config.record_movement;

        let mut num_collected = 0;
        let mut num_moved = 0;
        let mut num_blocked = 0;

        // STEP 1: AGENT PASS
        // Earlier agents deplete shared cells before later ones probe them.
        let (grid, agents) = self.state.split_mut();
        for agent in agents.iter_mut() {
            let action = agent.step(grid, &mut self.rng_manager)?;
            match action {
                AgentAction::Collected { cell } => {
                    num_collected += 1;
                    self.event_log.log(Event::Collected {
                        tick,
                        agent_id: agent.id(),
                        cell,
                    });
                }
                AgentAction::Moved {
                    from,
                    to,
                    direction,
                } => {
                    num_moved += 1;
                    if record_movement {
                        self.event_log.log(Event::Moved {
                            tick,
                            agent_id: agent.id(),
                            from,
                            to,
                            direction,
                        });
                    }
                }
                AgentAction::Blocked { at, direction } => {
                    num_blocked += 1;
                    if record_movement {
                        self.event_log.log(Event::Blocked {
                            tick,
                            agent_id: agent.id(),
                            at,
                            direction,
                        });
                    }
                }
            }
        }
        self.collected_units += num_collected;

        // STEP 2: TAX CYCLE
        let tax_cycle = if self.time_manager.is_tax_tick() {
            let cycle = self.tax_authority.run_cycle(self.state.agents_mut());
            self.tax_cycles += 1;
            debug!(tick, collected = cycle.collected, share = cycle.share, "Tax cycle closed");

            self.event_log.log(Event::TaxAssessed {
                tick,
                policy: cycle.policy,
                collected: cycle.collected,
                shortfall: cycle.shortfall,
                threshold: cycle.threshold,
                upper_bracket_agents: cycle.upper_bracket_agents,
            });
            self.event_log.log(Event::Redistributed {
                tick,
                share: cycle.share,
                distributed: cycle.distributed,
                residual: cycle.residual,
            });
            Some(cycle)
        } else {
            None
        };

        Ok(TickResult {
            tick,
            num_collected,
            num_moved,
            num_blocked,
            tax_cycle,
            remaining_units: self.state.grid().total_resource_units(),
            total_wealth: self.state.total_wealth(),
        })
    }

    /// Execute every remaining tick of the budget
    pub fn run_to_completion(&mut self) -> Result<(), SimulationError> {
        while !self.time_manager.is_finished() {
            self.tick()?;
        }
        info!(
            ticks = self.current_tick(),
            collected = self.collected_units,
            tax_cycles = self.tax_cycles,
            treasury = self.tax_authority.treasury(),
            "Simulation complete"
        );
        Ok(())
    }

    /// Summarize the run as it stands
    ///
    /// Fails with a statistics error for degenerate wallet lists (a single
    /// agent, or nobody holding anything).
    pub fn report(&self) -> Result<RunReport, SimulationError> {
        let wallets = self.state.wallets();
        let statistics = WealthStatistics::compute(&wallets)?;

        Ok(RunReport {
            config_hash: self.config_hash.clone(),
            rng_seed: self.config.rng_seed,
            ticks_run: self.current_tick(),
            tax_cycles: self.tax_cycles,
            initial_resource_units: self.initial_resource_units,
            remaining_resource_units: self.state.grid().total_resource_units(),
            collected_units: self.collected_units,
            treasury_balance: self.tax_authority.treasury(),
            wallets,
            statistics,
        })
    }

    /// Run the remaining ticks and report
    pub fn run(&mut self) -> Result<RunReport, SimulationError> {
        self.run_to_completion()?;
        self.report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            grid_width: 10,
            grid_height: 10,
            resource_fraction: 0.5,
            tick_budget: 50,
            agent_count: 5,
            tax_interval: 25,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_interval_longer_than_budget_is_rejected() {
        let config = SimulationConfig {
            tax_interval: 51,
            ..small_config()
        };
        assert!(matches!(
            Orchestrator::new(config),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_tick_after_budget_fails() {
        let mut orchestrator = Orchestrator::new(small_config()).unwrap();
        orchestrator.run_to_completion().unwrap();
        assert_eq!(
            orchestrator.tick(),
            Err(SimulationError::BudgetExhausted { tick_budget: 50 })
        );
    }

    #[test]
    fn test_tax_cycles_close_on_interval() {
        let mut orchestrator = Orchestrator::new(small_config()).unwrap();
        let mut taxed = Vec::new();
        while !orchestrator.is_finished() {
            let result = orchestrator.tick().unwrap();
            if result.tax_cycle.is_some() {
                taxed.push(result.tick);
            }
        }
        assert_eq!(taxed, vec![25, 50]);
        assert_eq!(orchestrator.event_log().events_of_type("tax_assessed").len(), 2);
    }
}
