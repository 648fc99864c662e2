//! End-of-run wealth statistics
//!
//! Dispersion and inequality measures over the final wallet list.
//!
//! Quartiles here are interpolation proxies, not rank statistics:
//! `Q1 = median − 0.5 × (median − min)` and `Q3 = median + 0.5 × (max − median)`.
//!
//! Two Gini coefficients are reported:
//! - [`literal_gini`]: `(n+1)/(n−1) − 2/(n(n−1)·mean) × Σ S[i]·S[⌊S[i]⌋]` over
//!   the wallets sorted descending. Each wallet indexes back into the sorted
//!   list by its own value, so the formula only evaluates while every wallet
//!   is smaller than the population size. It does not return 0 for equal
//!   wallets.
//! - [`textbook_gini`]: the standard rank-weighted form, 0 for equal
//!   wallets and approaching 1 as wealth concentrates.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Statistics that cannot be computed for the given wallets
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatisticsError {
    #[error("Degenerate statistics: need at least 2 wallets, got {n}")]
    TooFewSamples { n: usize },

    #[error("Degenerate statistics: mean wealth is zero")]
    ZeroMean,

    #[error("Gini self-index {index} is outside the {len} sorted wallets")]
    GiniIndexOutOfRange { index: usize, len: usize },
}

/// Summary of the final wallet distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WealthStatistics {
    pub count: usize,
    pub total_wealth: f64,
    pub mean: f64,
    /// Sample standard deviation (denominator `n − 1`)
    pub standard_deviation: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub first_quartile: f64,
    pub third_quartile: f64,
    pub below_median: usize,
    pub above_median: usize,
    pub below_first_quartile: usize,
    pub above_third_quartile: usize,
    /// Literal self-indexing Gini; `None` when a wallet indexes past the list
    pub gini: Option<f64>,
    pub textbook_gini: f64,
}

impl WealthStatistics {
    /// Summarize a wallet list
    ///
    /// # Errors
    ///
    /// `TooFewSamples` for fewer than two wallets, `ZeroMean` when nobody
    /// holds anything.
    ///
    /// # Example
    /// ```
    /// use wealth_simulator_core_rs::WealthStatistics;
    ///
    /// let stats = WealthStatistics::compute(&[0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(stats.mean, 2.0);
    /// assert_eq!(stats.median, 2.0);
    /// assert_eq!(stats.first_quartile, 1.0);
    /// assert_eq!(stats.third_quartile, 3.0);
    /// assert_eq!(stats.below_median, 2);
    /// ```
    pub fn compute(wallets: &[f64]) -> Result<Self, StatisticsError> {
        let n = wallets.len();
        if n <= 1 {
            return Err(StatisticsError::TooFewSamples { n });
        }

        let total_wealth: f64 = wallets.iter().sum();
        let mean = total_wealth / n as f64;
        if mean == 0.0 {
            return Err(StatisticsError::ZeroMean);
        }

        let standard_deviation = sample_standard_deviation(wallets, mean);

        let mut sorted = wallets.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = sorted[0];
        let max = sorted[n - 1];
        let median = median_of_sorted(&sorted);

        let first_quartile = median - 0.5 * (median - min);
        let third_quartile = median + 0.5 * (max - median);

        let gini = match literal_gini(wallets) {
            Ok(g) => Some(g),
            Err(err) => {
                warn!(%err, "Literal Gini coefficient unavailable");
                None
            }
        };

        Ok(Self {
            count: n,
            total_wealth,
            mean,
            standard_deviation,
            median,
            min,
            max,
            first_quartile,
            third_quartile,
            below_median: count_where(wallets, |w| w < median),
            above_median: count_where(wallets, |w| w > median),
            below_first_quartile: count_where(wallets, |w| w < first_quartile),
            above_third_quartile: count_where(wallets, |w| w > third_quartile),
            gini,
            textbook_gini: textbook_gini(wallets)?,
        })
    }
}

/// Median of an unsorted list; the mean of the middle pair for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(median_of_sorted(&sorted))
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

fn count_where(values: &[f64], pred: impl Fn(f64) -> bool) -> usize {
    values.iter().filter(|&&w| pred(w)).count()
}

fn sample_standard_deviation(values: &[f64], mean: f64) -> f64 {
    let squares: f64 = values.iter().map(|w| (w - mean).powi(2)).sum();
    (squares / (values.len() - 1) as f64).sqrt()
}

fn check_population(wallets: &[f64]) -> Result<(usize, f64), StatisticsError> {
    let n = wallets.len();
    if n <= 1 {
        return Err(StatisticsError::TooFewSamples { n });
    }
    let mean = wallets.iter().sum::<f64>() / n as f64;
    if mean == 0.0 {
        return Err(StatisticsError::ZeroMean);
    }
    Ok((n, mean))
}

/// Self-indexing Gini coefficient
///
/// Fails with `GiniIndexOutOfRange` as soon as a wallet's integer part is
/// not a valid index into the sorted list.
///
/// # Example
/// ```
/// use wealth_simulator_core_rs::stats::literal_gini;
///
/// // Equal wallets of 1.0: (5+1)/(5-1) - 2/(5*4*1) * 5 = 1.0
/// assert_eq!(literal_gini(&[1.0; 5]), Ok(1.0));
/// assert!(literal_gini(&[0.0, 7.0]).is_err());
/// ```
pub fn literal_gini(wallets: &[f64]) -> Result<f64, StatisticsError> {
    let (n, mean) = check_population(wallets)?;

    let mut sorted = wallets.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut weighted = 0.0;
    for &w in &sorted {
        let index = w.floor().max(0.0) as usize;
        let partner = sorted
            .get(index)
            .ok_or(StatisticsError::GiniIndexOutOfRange { index, len: n })?;
        weighted += w * partner;
    }

    let n = n as f64;
    Ok((n + 1.0) / (n - 1.0) - (2.0 / (n * (n - 1.0) * mean)) * weighted)
}

/// Standard Gini coefficient over ascending ranks
///
/// `G = 2 Σ i·x(i) / (n Σ x) − (n + 1) / n` with 1-based ranks `i`.
pub fn textbook_gini(wallets: &[f64]) -> Result<f64, StatisticsError> {
    let (n, mean) = check_population(wallets)?;

    let mut sorted = wallets.to_vec();
    sorted.sort_by(f64::total_cmp);

    let ranked: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &w)| (i + 1) as f64 * w)
        .sum();

    let n = n as f64;
    Ok(2.0 * ranked / (n * n * mean) - (n + 1.0) / n)
}
