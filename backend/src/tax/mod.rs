//! Taxation and redistribution
//!
//! Every tax cycle is a paired transaction: the [`TaxAuthority`] assesses
//! every wallet into its treasury, then pays the whole treasury back out in
//! equal shares. The assessment hands back a [`TaxAssessment`] token that
//! [`TaxAuthority::redistribute`] consumes, so a redistribution can never run
//! without an assessment in the same cycle.
//!
//! # Policies
//!
//! - **Flat**: every wallet pays `tax_rate`.
//! - **UpperBracket**: wallets at or above
//!   `median + ceil(0.5 × (max − median))` pay `upper_rate`; the rest pay
//!   `tax_rate`. Median and max are read once, before any deduction.
//!
//! # Accounting
//!
//! The treasury is credited with the nominal amount `wallet × rate` taken
//! from the wallet value seen before the deduction. A wallet is clipped at
//! zero; any part of the nominal amount it could not cover is reported as
//! `shortfall` but still counted in the treasury. With rates in `[0, 1]`
//! the shortfall is zero and money is conserved exactly.

mod authority;

pub use authority::{
    upper_bracket_threshold, Bracket, Redistribution, TaxAssessment, TaxAuthority, TaxCycle,
    TaxError, TREASURY_EPSILON,
};

use serde::{Deserialize, Serialize};

/// Which schedule the tax authority applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxPolicy {
    /// One rate for everybody
    #[default]
    Flat,

    /// Higher rate for wallets at or above the upper-bracket threshold
    UpperBracket,
}

impl std::fmt::Display for TaxPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxPolicy::Flat => write!(f, "flat"),
            TaxPolicy::UpperBracket => write!(f, "upper_bracket"),
        }
    }
}
