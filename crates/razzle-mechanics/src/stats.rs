//! Tallying session outcomes and empirical statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Count of sessions per net profit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    counts: BTreeMap<i64, u64>,
    total: u64,
}

impl Tally {
    /// An empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one session outcome.
    pub fn record(&mut self, profit: i64) {
        *self.counts.entry(profit).or_insert(0) += 1;
        self.total += 1;
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: &Tally) {
        for (&profit, &count) in &other.counts {
            *self.counts.entry(profit).or_insert(0) += count;
        }
        self.total += other.total;
    }

    /// Number of sessions recorded.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of sessions that ended with exactly `profit`.
    pub fn count(&self, profit: i64) -> u64 {
        self.counts.get(&profit).copied().unwrap_or(0)
    }

    /// `(profit, count)` pairs in ascending profit order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.counts.iter().map(|(&profit, &count)| (profit, count))
    }

    /// Empirical probability of `profit`; zero for an empty tally.
    pub fn probability(&self, profit: i64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(profit) as f64 / self.total as f64
    }

    /// Empirical probability of every observed profit.
    pub fn probabilities(&self) -> BTreeMap<i64, f64> {
        self.counts
            .keys()
            .map(|&profit| (profit, self.probability(profit)))
            .collect()
    }

    /// Average profit per session (the experimental return).
    pub fn mean(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: i128 = self
            .counts
            .iter()
            .map(|(&profit, &count)| i128::from(profit) * i128::from(count))
            .sum();
        sum as f64 / self.total as f64
    }

    /// Fraction of sessions with a positive profit.
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let wins: u64 = self.counts.range(1..).map(|(_, &count)| count).sum();
        wins as f64 / self.total as f64
    }
}

impl Extend<i64> for Tally {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for profit in iter {
            self.record(profit);
        }
    }
}

impl FromIterator<i64> for Tally {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut tally = Self::new();
        tally.extend(iter);
        tally
    }
}
