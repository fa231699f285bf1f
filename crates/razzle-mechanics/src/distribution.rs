//! Exact probability distributions.
//!
//! [`SumDistribution`] is the probability mass over dice sums. The single-roll
//! report enumerates every face combination; everything else convolves one die
//! at a time, which stays cheap for large pools. On top of it:
//!
//! - [`one_roll`] gives the profit distribution of a single roll taken in
//!   isolation, where step 0 is a bust and no stopping rules apply.
//! - [`session_distribution`] gives the exact profit distribution of a full
//!   session under a stopping policy, using the same transition as the
//!   simulator.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::rules::{self, NO_PROGRESS, Step};
use crate::session::{StoppingPolicy, Transition, transition};

/// Probability of each dice sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumDistribution {
    min: u32,
    probs: Vec<f64>,
}

impl SumDistribution {
    /// Count sums over all `faces^num_dice` equally likely face combinations.
    pub fn enumerate(num_dice: u32, faces: u32) -> Self {
        let min = num_dice;
        let mut counts = vec![0u64; (num_dice * faces - min + 1) as usize];
        let mut combo = vec![1u32; num_dice as usize];
        let mut total = 0u64;
        'combos: loop {
            let sum: u32 = combo.iter().sum();
            counts[(sum - min) as usize] += 1;
            total += 1;
            for face in combo.iter_mut() {
                if *face < faces {
                    *face += 1;
                    continue 'combos;
                }
                *face = 1;
            }
            break;
        }
        let probs = counts
            .into_iter()
            .map(|c| c as f64 / total as f64)
            .collect();
        Self { min, probs }
    }

    /// Build the same distribution by repeated convolution of one die.
    pub fn convolve(num_dice: u32, faces: u32) -> Self {
        let mut ways = vec![1.0f64];
        for _ in 0..num_dice {
            let mut next = vec![0.0; ways.len() + faces as usize - 1];
            for (offset, w) in ways.iter().enumerate() {
                for face in 0..faces as usize {
                    next[offset + face] += w;
                }
            }
            ways = next;
        }
        let total: f64 = ways.iter().sum();
        Self {
            min: num_dice,
            probs: ways.into_iter().map(|w| w / total).collect(),
        }
    }

    /// The sum distribution for a configuration's dice, by convolution.
    pub fn for_config(config: &GameConfig) -> Self {
        Self::convolve(config.num_dice(), config.faces())
    }

    /// Smallest possible sum.
    pub fn min_sum(&self) -> u32 {
        self.min
    }

    /// Largest possible sum.
    pub fn max_sum(&self) -> u32 {
        self.min + self.probs.len() as u32 - 1
    }

    /// Probability of rolling exactly `sum`.
    pub fn probability(&self, sum: u32) -> f64 {
        sum.checked_sub(self.min)
            .and_then(|i| self.probs.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// `(sum, probability)` pairs in ascending sum order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.probs
            .iter()
            .enumerate()
            .map(|(i, &p)| (self.min + i as u32, p))
    }

    /// Expected sum.
    pub fn mean(&self) -> f64 {
        self.iter().map(|(s, p)| f64::from(s) * p).sum()
    }
}

/// Probability of each net profit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitDistribution {
    probs: BTreeMap<i64, f64>,
}

impl ProfitDistribution {
    /// An empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add probability mass to `profit`.
    pub fn add(&mut self, profit: i64, p: f64) {
        *self.probs.entry(profit).or_insert(0.0) += p;
    }

    /// Probability of ending with exactly `profit`.
    pub fn probability(&self, profit: i64) -> f64 {
        self.probs.get(&profit).copied().unwrap_or(0.0)
    }

    /// `(profit, probability)` pairs in ascending profit order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.probs.iter().map(|(&profit, &p)| (profit, p))
    }

    /// Number of distinct profits listed.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Returns true if no profit is listed.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Total probability mass; 1 for a complete distribution.
    pub fn total(&self) -> f64 {
        self.probs.values().sum()
    }

    /// Expected profit per game.
    pub fn expected_value(&self) -> f64 {
        self.iter().map(|(profit, p)| profit as f64 * p).sum()
    }

    /// Probability of ending with a positive profit.
    pub fn win_probability(&self) -> f64 {
        self.iter()
            .filter(|&(profit, _)| profit > 0)
            .map(|(_, p)| p)
            .sum()
    }
}

/// Profit distribution of one roll taken on its own.
///
/// Every possible profit is listed, with zero probability where unreachable.
pub fn one_roll(config: &GameConfig) -> ProfitDistribution {
    let mut dist = ProfitDistribution::new();
    for profit in rules::possible_profits(config) {
        dist.add(profit, 0.0);
    }
    let sums = SumDistribution::enumerate(config.num_dice(), config.faces());
    for (sum, p) in sums.iter() {
        if p == 0.0 {
            continue;
        }
        let step = rules::next_step(sum, config);
        let profit = if step == NO_PROGRESS {
            -config.stake()
        } else {
            rules::profit(step, config)
        };
        dist.add(profit, p);
    }
    dist
}

/// Exact profit distribution of a whole session under `policy`.
pub fn session_distribution(config: &GameConfig, policy: &StoppingPolicy) -> ProfitDistribution {
    let sums = SumDistribution::for_config(config);
    let mut memo = HashMap::new();
    outcomes_from(
        config,
        policy,
        &sums,
        &mut memo,
        config.max_rolls(),
        NO_PROGRESS,
    )
}

fn outcomes_from(
    config: &GameConfig,
    policy: &StoppingPolicy,
    sums: &SumDistribution,
    memo: &mut HashMap<(u32, Step), ProfitDistribution>,
    rolls_left: u32,
    step: Step,
) -> ProfitDistribution {
    if let Some(cached) = memo.get(&(rolls_left, step)) {
        return cached.clone();
    }

    let after = rolls_left - 1;
    let mut dist = ProfitDistribution::new();
    for (sum, p) in sums.iter() {
        if p == 0.0 {
            continue;
        }
        match transition(config, policy, step, after, sum) {
            Transition::Bust => dist.add(-config.stake(), p),
            Transition::CashOut(end) => dist.add(rules::profit(end, config), p),
            Transition::Continue(next) => {
                let rest = outcomes_from(config, policy, sums, memo, after, next);
                for (profit, q) in rest.iter() {
                    dist.add(profit, p * q);
                }
            }
        }
    }

    memo.insert((rolls_left, step), dist.clone());
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameParams;
    use proptest::prelude::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn three_d6_counts() {
        let dist = SumDistribution::enumerate(3, 6);
        assert_eq!(dist.min_sum(), 3);
        assert_eq!(dist.max_sum(), 18);
        assert!((dist.probability(3) - 1.0 / 216.0).abs() < EPS);
        assert!((dist.probability(10) - 27.0 / 216.0).abs() < EPS);
        assert!((dist.probability(12) - 25.0 / 216.0).abs() < EPS);
        assert_eq!(dist.probability(2), 0.0);
        assert_eq!(dist.probability(19), 0.0);
        assert!((dist.mean() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn enumeration_matches_convolution() {
        for dice in 1..=4 {
            for faces in [2, 4, 6] {
                let a = SumDistribution::enumerate(dice, faces);
                let b = SumDistribution::convolve(dice, faces);
                assert_eq!(a.min_sum(), b.min_sum());
                assert_eq!(a.max_sum(), b.max_sum());
                for (sum, p) in a.iter() {
                    assert!((p - b.probability(sum)).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn one_roll_default() {
        let dist = one_roll(&GameConfig::default());
        let expect = [
            (-3, 104.0),
            (-2, 1.0),
            (-1, 34.0),
            (1, 57.0),
            (3, 16.0),
            (6, 4.0),
        ];
        assert_eq!(dist.len(), expect.len());
        for (profit, count) in expect {
            assert!(
                (dist.probability(profit) - count / 216.0).abs() < EPS,
                "profit {profit}"
            );
        }
        assert!((dist.expected_value() + 219.0 / 216.0).abs() < 1e-9);
        assert!((dist.win_probability() - 77.0 / 216.0).abs() < 1e-9);
    }

    #[test]
    fn one_roll_lists_unreachable_profits() {
        // Thresholds so low that step 1 is never reached by 3d6.
        let config = GameParams::default()
            .with_thresholds([2, 7, 14, 16, 18])
            .build()
            .unwrap();
        let dist = one_roll(&config);
        assert!(dist.iter().any(|(profit, p)| profit == -2 && p == 0.0));
    }

    #[test]
    fn single_roll_session_matches_one_roll() {
        let config = GameParams::default().with_max_rolls(1).build().unwrap();
        let session = session_distribution(&config, &StoppingPolicy::heuristic());
        let single = one_roll(&config);
        for (profit, p) in single.iter() {
            assert!((session.probability(profit) - p).abs() < EPS);
        }
    }

    #[test]
    fn session_distribution_default_is_complete() {
        let dist = session_distribution(&GameConfig::default(), &StoppingPolicy::heuristic());
        assert!((dist.total() - 1.0).abs() < 1e-9);
        // A first-roll bust alone is 104/216.
        assert!(dist.probability(-3) > 104.0 / 216.0);
    }

    #[test]
    fn large_pools_are_convolved() {
        // 20d6 has 6^20 face combinations; only convolution can handle it.
        let config = GameParams::default().with_num_dice(20).build().unwrap();
        let sums = SumDistribution::for_config(&config);
        assert_eq!(sums, SumDistribution::convolve(20, 6));
        assert_eq!((sums.min_sum(), sums.max_sum()), (20, 120));
        assert!((sums.mean() - 70.0).abs() < 1e-9);
        let dist = session_distribution(&config, &StoppingPolicy::heuristic());
        assert!((dist.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn two_roll_session_by_hand() {
        // Roll 1: bust 104, step 1 (sum 3) 1, step 2 (4..=7) 34, cash out at 3+ 77.
        // Step 2 with one roll left locks in, so only step 1 rolls again.
        // From step 1: bust 104, stay at 1 via sum 3 1, step 2 34, 3+ 77.
        let config = GameParams::default().with_max_rolls(2).build().unwrap();
        let dist = session_distribution(&config, &StoppingPolicy::heuristic());
        let n = 216.0;
        let bust = 104.0 / n + (1.0 / n) * (104.0 / n);
        assert!((dist.probability(-3) - bust).abs() < EPS);
        let step_one = (1.0 / n) * (1.0 / n);
        assert!((dist.probability(-2) - step_one).abs() < EPS);
        let step_two = 34.0 / n + (1.0 / n) * (34.0 / n);
        assert!((dist.probability(-1) - step_two).abs() < EPS);
    }

    #[test]
    fn exhaust_policy_busts_more_often() {
        let config = GameConfig::default();
        let heuristic = session_distribution(&config, &StoppingPolicy::heuristic());
        let exhaust = session_distribution(&config, &StoppingPolicy::exhaust());
        assert!((exhaust.total() - 1.0).abs() < 1e-9);
        assert!(exhaust.probability(-3) > heuristic.probability(-3));
    }

    #[test]
    fn profit_distribution_accumulates() {
        let mut dist = ProfitDistribution::new();
        assert!(dist.is_empty());
        dist.add(2, 0.25);
        dist.add(2, 0.25);
        dist.add(-1, 0.5);
        assert_eq!(dist.len(), 2);
        assert!((dist.probability(2) - 0.5).abs() < EPS);
        assert!((dist.expected_value() - 0.5).abs() < EPS);
        assert!((dist.win_probability() - 0.5).abs() < EPS);
    }

    proptest! {
        #[test]
        fn one_roll_mass_sums_to_one(
            dice in 1u32..=4,
            faces in 1u32..=8,
            half in 0u32..=10,
            mut thresholds in prop::array::uniform5(0u32..=32),
            stake in 1i64..=10,
        ) {
            thresholds.sort_unstable();
            let config = GameParams::default()
                .with_num_dice(dice)
                .with_faces(faces)
                .with_no_win_half_width(f64::from(half) / 2.0)
                .with_thresholds(thresholds)
                .with_stake(stake)
                .build()
                .unwrap();
            prop_assert!((one_roll(&config).total() - 1.0).abs() < 1e-9);
            let session = session_distribution(&config, &StoppingPolicy::heuristic());
            prop_assert!((session.total() - 1.0).abs() < 1e-9);
        }

        #[test]
        fn rule_engine_is_pure(sum in 0u32..=20) {
            let config = GameConfig::default();
            let first = (rules::next_step(sum, &config), rules::fail_band(&config));
            let second = (rules::next_step(sum, &config), rules::fail_band(&config));
            prop_assert_eq!(first, second);
            let step = first.0;
            prop_assert_eq!(rules::payout(step, &config), rules::payout(step, &config));
        }
    }
}
