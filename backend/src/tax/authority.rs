//! Tax authority: assessment, redistribution, and the treasury between them

use thiserror::Error;
use tracing::debug;

use super::TaxPolicy;
use crate::models::agent::Agent;
use crate::stats::median;

/// Treasury residue below this magnitude is snapped to exactly zero after a
/// redistribution pass.
pub const TREASURY_EPSILON: f64 = 1e-5;

/// Errors raised when building a tax authority
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaxError {
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("Tax authority needs at least one agent")]
    EmptyPopulation,
}

/// Rate band a wallet fell into during an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Base,
    Upper,
}

/// Proof that an assessment ran; consumed by [`TaxAuthority::redistribute`]
#[derive(Debug)]
#[must_use = "an assessment must be redistributed in the same cycle"]
pub struct TaxAssessment {
    policy: TaxPolicy,
    collected: f64,
    shortfall: f64,
    threshold: Option<f64>,
    upper_bracket_agents: usize,
}

impl TaxAssessment {
    pub fn policy(&self) -> TaxPolicy {
        self.policy
    }

    /// Nominal amount credited to the treasury
    pub fn collected(&self) -> f64 {
        self.collected
    }

    /// Part of the nominal amount that no wallet could cover
    pub fn shortfall(&self) -> f64 {
        self.shortfall
    }

    /// Upper-bracket threshold (`None` under the flat policy)
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn upper_bracket_agents(&self) -> usize {
        self.upper_bracket_agents
    }
}

/// Outcome of one redistribution pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Redistribution {
    /// Amount credited to each agent
    pub share: f64,
    /// Sum of all shares paid out
    pub distributed: f64,
    /// Treasury after the pass and the epsilon snap
    pub residual: f64,
}

/// Combined record of an assess-then-redistribute cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxCycle {
    pub policy: TaxPolicy,
    pub collected: f64,
    pub shortfall: f64,
    pub threshold: Option<f64>,
    pub upper_bracket_agents: usize,
    pub share: f64,
    pub distributed: f64,
    pub residual: f64,
}

/// Upper-bracket threshold for a set of wallets
///
/// `median + ceil(0.5 × (max − median))`, or `None` for an empty set.
///
/// # Example
/// ```
/// use wealth_simulator_core_rs::tax::upper_bracket_threshold;
///
/// // median 2, max 9: 2 + ceil(3.5) = 6
/// assert_eq!(upper_bracket_threshold(&[1.0, 2.0, 9.0]), Some(6.0));
/// ```
pub fn upper_bracket_threshold(wallets: &[f64]) -> Option<f64> {
    let m = median(wallets)?;
    let mx = wallets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(m + (0.5 * (mx - m)).ceil())
}

/// Collects tax from agents and pays it back out in equal shares
///
/// # Example
/// ```
/// use wealth_simulator_core_rs::{Agent, Cell, TaxAuthority, TaxPolicy};
///
/// let mut agents = vec![Agent::new(0, Cell::new(0, 0)), Agent::new(1, Cell::new(0, 0))];
/// agents[0].credit(10.0);
///
/// let mut authority = TaxAuthority::new(TaxPolicy::Flat, 0.5, 0.0, agents.len()).unwrap();
/// let assessment = authority.assess(&mut agents);
/// assert_eq!(assessment.collected(), 5.0);
///
/// let paid = authority.redistribute(assessment, &mut agents);
/// assert_eq!(paid.share, 2.5);
/// assert_eq!(agents[0].wallet(), 7.5);
/// assert_eq!(agents[1].wallet(), 2.5);
/// assert_eq!(authority.treasury(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TaxAuthority {
    policy: TaxPolicy,
    tax_rate: f64,
    upper_rate: f64,
    /// Income held between assessment and redistribution
    treasury: f64,
    /// Redistribution denominator
    agent_count: f64,
}

impl TaxAuthority {
    /// Create a tax authority for a population of `agent_count` agents
    ///
    /// `upper_rate` is only read by [`TaxPolicy::UpperBracket`] but is
    /// validated either way.
    pub fn new(
        policy: TaxPolicy,
        tax_rate: f64,
        upper_rate: f64,
        agent_count: usize,
    ) -> Result<Self, TaxError> {
        check_rate("tax_rate", tax_rate)?;
        check_rate("upper_rate", upper_rate)?;
        if agent_count == 0 {
            return Err(TaxError::EmptyPopulation);
        }

        Ok(Self {
            policy,
            tax_rate,
            upper_rate,
            treasury: 0.0,
            agent_count: agent_count as f64,
        })
    }

    pub fn policy(&self) -> TaxPolicy {
        self.policy
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn upper_rate(&self) -> f64 {
        self.upper_rate
    }

    /// Current treasury balance
    pub fn treasury(&self) -> f64 {
        self.treasury
    }

    /// Rate and bracket applied to `wallet` given this cycle's threshold
    pub fn rate_for(&self, wallet: f64, threshold: Option<f64>) -> (f64, Bracket) {
        match (self.policy, threshold) {
            (TaxPolicy::UpperBracket, Some(tq)) if wallet >= tq => (self.upper_rate, Bracket::Upper),
            _ => (self.tax_rate, Bracket::Base),
        }
    }

    /// Tax every agent once and move the proceeds into the treasury
    pub fn assess(&mut self, agents: &mut [Agent]) -> TaxAssessment {
        let threshold = match self.policy {
            TaxPolicy::Flat => None,
            TaxPolicy::UpperBracket => {
                let wallets: Vec<f64> = agents.iter().map(Agent::wallet).collect();
                upper_bracket_threshold(&wallets)
            }
        };

        let mut collected = 0.0;
        let mut shortfall = 0.0;
        let mut upper_bracket_agents = 0;

        for agent in agents.iter_mut() {
            let (rate, bracket) = self.rate_for(agent.wallet(), threshold);
            let nominal = agent.wallet() * rate;
            shortfall += agent.deduct(nominal);
            self.treasury += nominal;
            collected += nominal;
            if bracket == Bracket::Upper {
                upper_bracket_agents += 1;
            }
        }

        debug!(
            policy = %self.policy,
            collected,
            shortfall,
            ?threshold,
            upper_bracket_agents,
            "Tax assessed"
        );

        TaxAssessment {
            policy: self.policy,
            collected,
            shortfall,
            threshold,
            upper_bracket_agents,
        }
    }

    /// Pay the whole treasury back out in equal shares
    pub fn redistribute(&mut self, _assessment: TaxAssessment, agents: &mut [Agent]) -> Redistribution {
        let share = self.treasury / self.agent_count;
        let mut distributed = 0.0;

        for agent in agents.iter_mut() {
            distributed += agent.credit(share);
            self.treasury -= share;
        }

        if self.treasury.abs() < TREASURY_EPSILON {
            self.treasury = 0.0;
        }

        debug!(share, distributed, residual = self.treasury, "Treasury redistributed");

        Redistribution {
            share,
            distributed,
            residual: self.treasury,
        }
    }

    /// Assess then redistribute
    pub fn run_cycle(&mut self, agents: &mut [Agent]) -> TaxCycle {
        let assessment = self.assess(agents);
        let policy = assessment.policy();
        let collected = assessment.collected();
        let shortfall = assessment.shortfall();
        let threshold = assessment.threshold();
        let upper_bracket_agents = assessment.upper_bracket_agents();

        let paid = self.redistribute(assessment, agents);

        TaxCycle {
            policy,
            collected,
            shortfall,
            threshold,
            upper_bracket_agents,
            share: paid.share,
            distributed: paid.distributed,
            residual: paid.residual,
        }
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), TaxError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TaxError::RateOutOfRange { name, value })
    }
}
