//! Property-based tests for the simulation's invariants
//!
//! These hold for every grid size, seed, wallet list and rate in range, not
//! just the hand-picked scenarios in the other suites.

use proptest::prelude::*;
use wealth_simulator_core_rs::stats::{literal_gini, median, textbook_gini};
use wealth_simulator_core_rs::tax::{upper_bracket_threshold, Bracket};
use wealth_simulator_core_rs::{
    Agent, Cell, Direction, Orchestrator, ResourceGrid, RngManager, SeedingPolicy,
    SimulationConfig, TaxAuthority, TaxPolicy, WealthStatistics,
};

fn agents_with(wallets: &[f64]) -> Vec<Agent> {
    wallets
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let mut agent = Agent::new(i, Cell::new(0, 0));
            agent.credit(w);
            agent
        })
        .collect()
}

fn wallets_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..100.0, 2..30)
}

// ============================================================================
// Grid Properties
// ============================================================================

proptest! {
    /// Property: fixed-draw seeding never places more units than it draws.
    #[test]
    fn prop_fixed_draws_bounded_by_target(
        width in 1usize..20,
        height in 1usize..20,
        fraction in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = RngManager::new(seed);
        let grid = ResourceGrid::seeded(width, height, fraction, SeedingPolicy::FixedDraws, &mut rng).unwrap();
        let target = (fraction * (width * height) as f64).ceil() as usize;

        prop_assert!(grid.total_resource_units() <= target);
        prop_assert_eq!(grid.cell_count(), width * height);
    }

    /// Property: exact-count seeding always hits the target.
    #[test]
    fn prop_exact_count_hits_target(
        width in 1usize..12,
        height in 1usize..12,
        fraction in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = RngManager::new(seed);
        let grid = ResourceGrid::seeded(width, height, fraction, SeedingPolicy::ExactCount, &mut rng).unwrap();
        let target = ((fraction * (width * height) as f64).ceil() as usize).min(width * height);

        prop_assert_eq!(grid.total_resource_units(), target);
    }

    /// Property: neighbors are in bounds and exactly one step away.
    #[test]
    fn prop_neighbor_is_adjacent_and_in_bounds(
        width in 1usize..20,
        height in 1usize..20,
        x in 0usize..20,
        y in 0usize..20,
    ) {
        let grid = ResourceGrid::empty(width, height).unwrap();
        let cell = Cell::new(x % width, y % height);

        for direction in Direction::ALL {
            if let Some(next) = grid.neighbor(cell, direction) {
                prop_assert!(grid.contains(next));
                prop_assert_eq!(cell.x.abs_diff(next.x) + cell.y.abs_diff(next.y), 1);
            }
        }
    }

    /// Property: depleting twice removes at most one unit.
    #[test]
    fn prop_depletion_is_idempotent(
        width in 1usize..10,
        height in 1usize..10,
        seed in any::<u64>(),
    ) {
        let mut rng = RngManager::new(seed);
        let mut grid = ResourceGrid::seeded(width, height, 0.5, SeedingPolicy::FixedDraws, &mut rng).unwrap();
        let cell = grid.random_cell(&mut rng);
        let before = grid.total_resource_units();
        let had_unit = grid.is_occupied(cell).unwrap();

        let first = grid.deplete(cell).unwrap();
        let second = grid.deplete(cell).unwrap();

        prop_assert_eq!(first, had_unit);
        prop_assert!(!second);
        prop_assert_eq!(before - grid.total_resource_units(), usize::from(had_unit));
    }

    /// Property: an agent never leaves the grid, whatever it steps through.
    #[test]
    fn prop_agent_stays_on_grid(
        width in 1usize..8,
        height in 1usize..8,
        seed in any::<u64>(),
    ) {
        let mut rng = RngManager::new(seed);
        let mut grid = ResourceGrid::empty(width, height).unwrap();
        let mut agent = Agent::spawn(0, &grid, &mut rng);
        grid.scatter(0.3, SeedingPolicy::FixedDraws, &mut rng).unwrap();

        for _ in 0..60 {
            agent.step(&mut grid, &mut rng).unwrap();
            prop_assert!(grid.contains(agent.position()));
        }
    }
}

// ============================================================================
// Tax Properties
// ============================================================================

proptest! {
    /// Property: a flat cycle moves wealth around without creating or
    /// destroying it, and leaves no wallet negative.
    #[test]
    fn prop_flat_cycle_conserves_wealth(
        wallets in wallets_strategy(),
        rate in 0.0f64..=1.0,
    ) {
        let mut agents = agents_with(&wallets);
        let before: f64 = wallets.iter().sum();
        let mut authority = TaxAuthority::new(TaxPolicy::Flat, rate, 0.0, agents.len()).unwrap();

        let cycle = authority.run_cycle(&mut agents);
        let after: f64 = agents.iter().map(Agent::wallet).sum();

        prop_assert!((after - before).abs() < 1e-9);
        prop_assert_eq!(cycle.shortfall, 0.0);
        prop_assert_eq!(authority.treasury(), 0.0);
        prop_assert!(agents.iter().all(|a| a.wallet() >= 0.0));
    }

    /// Property: the bracketed cycle conserves wealth the same way.
    #[test]
    fn prop_upper_bracket_cycle_conserves_wealth(
        wallets in wallets_strategy(),
        base in 0.0f64..=1.0,
        upper in 0.0f64..=1.0,
    ) {
        let mut agents = agents_with(&wallets);
        let before: f64 = wallets.iter().sum();
        let mut authority = TaxAuthority::new(TaxPolicy::UpperBracket, base, upper, agents.len()).unwrap();

        let cycle = authority.run_cycle(&mut agents);
        let after: f64 = agents.iter().map(Agent::wallet).sum();

        prop_assert!((after - before).abs() < 1e-9);
        prop_assert_eq!(cycle.shortfall, 0.0);
        prop_assert!(agents.iter().all(|a| a.wallet() >= 0.0));
        prop_assert!(cycle.upper_bracket_agents <= agents.len());
    }

    /// Property: the threshold lies between the median and the maximum.
    #[test]
    fn prop_threshold_between_median_and_max(wallets in wallets_strategy()) {
        let threshold = upper_bracket_threshold(&wallets).unwrap();
        let max = wallets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mid = median(&wallets).unwrap();

        prop_assert!(threshold >= mid);
        prop_assert!(threshold < max + 1.0);
    }

    /// Property: with the upper rate at or above the base rate, a richer
    /// wallet is never taxed at a lower rate.
    #[test]
    fn prop_bracket_rate_is_monotone(
        base in 0.0f64..0.5,
        upper in 0.5f64..=1.0,
        threshold in 0.0f64..100.0,
        a in 0.0f64..200.0,
        b in 0.0f64..200.0,
    ) {
        let authority = TaxAuthority::new(TaxPolicy::UpperBracket, base, upper, 1).unwrap();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let (low_rate, low_bracket) = authority.rate_for(low, Some(threshold));
        let (high_rate, _) = authority.rate_for(high, Some(threshold));

        prop_assert!(low_rate <= high_rate);
        if low_bracket == Bracket::Upper {
            prop_assert_eq!(high_rate, upper);
        }
    }
}

// ============================================================================
// Statistics Properties
// ============================================================================

proptest! {
    /// Property: the quartile proxies are ordered inside [min, max].
    #[test]
    fn prop_quartiles_are_ordered(wallets in prop::collection::vec(0.5f64..100.0, 2..30)) {
        let stats = WealthStatistics::compute(&wallets).unwrap();

        prop_assert!(stats.min <= stats.first_quartile);
        prop_assert!(stats.first_quartile <= stats.median);
        prop_assert!(stats.median <= stats.third_quartile);
        prop_assert!(stats.third_quartile <= stats.max);
        prop_assert!(stats.below_median + stats.above_median <= stats.count);
        prop_assert!(stats.standard_deviation >= 0.0);
    }

    /// Property: the rank-weighted Gini stays in [0, 1).
    #[test]
    fn prop_textbook_gini_in_unit_interval(wallets in prop::collection::vec(0.5f64..100.0, 2..30)) {
        let g = textbook_gini(&wallets).unwrap();
        prop_assert!(g > -1e-12);
        prop_assert!(g < 1.0);
    }

    /// Property: the literal Gini evaluates whenever every wallet indexes
    /// inside the sorted list.
    #[test]
    fn prop_literal_gini_defined_for_small_wallets(
        raw in prop::collection::vec(0.0f64..0.99, 2..30),
    ) {
        let n = raw.len() as f64;
        let mut wallets: Vec<f64> = raw.iter().map(|r| r * n).collect();
        wallets[0] = 1.0;

        prop_assert!(literal_gini(&wallets).is_ok());
    }
}

// ============================================================================
// Whole-run Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: a full run never holds more wealth than the grid started with.
    #[test]
    fn prop_run_bounded_by_initial_units(
        width in 1usize..10,
        height in 1usize..10,
        agent_count in 1usize..8,
        tax_interval in 1usize..10,
        cycles in 1usize..4,
        tax_policy in prop_oneof![Just(TaxPolicy::Flat), Just(TaxPolicy::UpperBracket)],
        tax_rate in 0.0f64..=1.0,
        upper_rate in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let config = SimulationConfig {
            grid_width: width,
            grid_height: height,
            resource_fraction: 0.4,
            tick_budget: tax_interval * cycles,
            agent_count,
            tax_interval,
            tax_policy,
            tax_rate,
            upper_rate,
            rng_seed: seed,
            ..SimulationConfig::default()
        };
        let mut orchestrator = Orchestrator::new(config).unwrap();
        orchestrator.run_to_completion().unwrap();

        let total: f64 = orchestrator.wallets().iter().sum();
        prop_assert!(total <= orchestrator.initial_resource_units() as f64 + 1e-9);
        prop_assert!((total - orchestrator.collected_units() as f64).abs() < 1e-9);
        prop_assert!(orchestrator.wallets().iter().all(|&w| w >= 0.0));
        for &position in &orchestrator.state().agent_positions() {
            prop_assert!(orchestrator.state().grid().contains(position));
        }
    }
}
