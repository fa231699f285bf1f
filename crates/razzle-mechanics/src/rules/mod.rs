//! Rule engine: sum range, no-win band, step transitions, and payouts.
//!
//! Every function here is pure. Given the same [`GameConfig`] and inputs they
//! always return the same answer, so callers can share one configuration
//! across any number of sessions.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::dice::DicePool;

/// A progress milestone in `0..=5`. Step 0 means no progress.
pub type Step = u8;

/// Number of progress milestones above step 0.
pub const STEP_COUNT: usize = 5;

/// The step a roll in the no-win band maps to.
pub const NO_PROGRESS: Step = 0;

/// The highest reachable step.
pub const MAX_STEP: Step = STEP_COUNT as Step;

/// Inclusive band of sums that yield no progress.
///
/// The band is empty when `min > max`, which happens for a zero half-width
/// over an even number of possible sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailBand {
    /// Lowest sum in the band.
    pub min: u32,
    /// Highest sum in the band.
    pub max: u32,
}

impl FailBand {
    /// Returns true if `sum` falls inside the band.
    pub fn contains(&self, sum: u32) -> bool {
        (self.min..=self.max).contains(&sum)
    }

    /// Returns true if no sum falls inside the band.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

impl std::fmt::Display for FailBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

/// Smallest and largest possible dice sum.
pub fn sum_range(config: &GameConfig) -> (u32, u32) {
    let pool = DicePool::for_config(config);
    (pool.min_total(), pool.max_total())
}

/// The no-progress band, centred on the mean sum and clamped to the sum range.
pub fn fail_band(config: &GameConfig) -> FailBand {
    let (min_sum, max_sum) = sum_range(config);
    let mid = f64::from(min_sum + max_sum) / 2.0;
    let r = config.no_win_half_width();
    let lo = (mid - r).ceil().max(f64::from(min_sum));
    let hi = (mid + r).floor().min(f64::from(max_sum));
    FailBand {
        min: lo as u32,
        max: hi as u32,
    }
}

/// Map a dice sum to a step.
///
/// Sums in the fail band give [`NO_PROGRESS`]. Otherwise the thresholds are
/// walked from step 1 to step 5 and the first one at or above `sum` wins;
/// sums above every threshold still reach step 5. Thresholds are never
/// reordered.
pub fn next_step(sum: u32, config: &GameConfig) -> Step {
    if fail_band(config).contains(sum) {
        return NO_PROGRESS;
    }
    config
        .thresholds()
        .iter()
        .position(|&threshold| sum <= threshold)
        .map_or(MAX_STEP, |i| i as Step + 1)
}

/// The payout for reaching `step`; zero outside `1..=5`.
pub fn payout(step: Step, config: &GameConfig) -> i64 {
    config
        .payouts()
        .get(usize::from(step).wrapping_sub(1))
        .copied()
        .unwrap_or(0)
}

/// Net profit for cashing out at `step`.
pub fn profit(step: Step, config: &GameConfig) -> i64 {
    payout(step, config) - config.stake()
}

/// Every profit a session can end with, ascending and deduplicated.
pub fn possible_profits(config: &GameConfig) -> Vec<i64> {
    let mut profits: Vec<i64> = (NO_PROGRESS..=MAX_STEP)
        .map(|step| profit(step, config))
        .collect();
    profits.sort_unstable();
    profits.dedup();
    profits
}
