//! Event logging for simulation replay and auditing.
//!
//! The event log records every state change that moves wealth:
//! - **Collected**: an agent picked up a resource unit
//! - **TaxAssessed** / **Redistributed**: one tax cycle, in that order
//!
//! Per-agent movement (**Moved**, **Blocked**) is high volume and only
//! recorded when the run is configured with `record_movement`.
//!
//! # Example
//!
//! ```rust
//! use wealth_simulator_core_rs::models::{Event, EventLog};
//! use wealth_simulator_core_rs::Cell;
//!
//! let mut log = EventLog::new();
//! log.log(Event::Collected { tick: 3, agent_id: 0, cell: Cell::new(1, 1) });
//!
//! assert_eq!(log.events_at_tick(3).len(), 1);
//! assert_eq!(log.events_of_type("collected").len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::models::grid::{Cell, Direction};
use crate::tax::TaxPolicy;

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Agent took the unit on its cell
    Collected {
        tick: usize,
        agent_id: usize,
        cell: Cell,
    },

    /// Agent stepped to a neighboring cell
    Moved {
        tick: usize,
        agent_id: usize,
        from: Cell,
        to: Cell,
        direction: Direction,
    },

    /// Agent drew a direction leading off the grid and stayed put
    Blocked {
        tick: usize,
        agent_id: usize,
        at: Cell,
        direction: Direction,
    },

    /// Tax assessed on every wallet
    TaxAssessed {
        tick: usize,
        policy: TaxPolicy,
        /// Nominal amount credited to the treasury
        collected: f64,
        /// Part of the nominal amount no wallet could cover
        shortfall: f64,
        /// Upper-bracket threshold, when the policy has one
        threshold: Option<f64>,
        /// Agents taxed at the upper rate
        upper_bracket_agents: usize,
    },

    /// Treasury paid back out in equal shares
    Redistributed {
        tick: usize,
        share: f64,
        distributed: f64,
        /// Treasury left after the pass (after the epsilon snap)
        residual: f64,
    },
}

impl Event {
    /// Tick the event happened at
    pub fn tick(&self) -> usize {
        match self {
            Event::Collected { tick, .. }
            | Event::Moved { tick, .. }
            | Event::Blocked { tick, .. }
            | Event::TaxAssessed { tick, .. }
            | Event::Redistributed { tick, .. } => *tick,
        }
    }

    /// Stable snake_case name of the variant
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Collected { .. } => "collected",
            Event::Moved { .. } => "moved",
            Event::Blocked { .. } => "blocked",
            Event::TaxAssessed { .. } => "tax_assessed",
            Event::Redistributed { .. } => "redistributed",
        }
    }

    /// Agent the event belongs to, if it is a per-agent event
    pub fn agent_id(&self) -> Option<usize> {
        match self {
            Event::Collected { agent_id, .. }
            | Event::Moved { agent_id, .. }
            | Event::Blocked { agent_id, .. } => Some(*agent_id),
            Event::TaxAssessed { .. } | Event::Redistributed { .. } => None,
        }
    }
}

/// Append-only event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific agent
    pub fn events_for_agent(&self, agent_id: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.agent_id() == Some(agent_id))
            .collect()
    }
}
