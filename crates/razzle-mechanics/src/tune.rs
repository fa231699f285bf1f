//! Parameter tuning by coordinate descent.
//!
//! Starting from a configuration, each tunable parameter is nudged by +1 and
//! then -1. The first nudge that lowers the loss is kept and the search moves
//! on to the next parameter. Sweeps repeat until a whole sweep finds nothing
//! better or the iteration cap is reached.
//!
//! The loss balances the house edge against how often players win:
//! `|avg_profit - target_profit| + lambda * (win_rate - target_win_rate)^2`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{GameConfig, GameParams, Param};
use crate::distribution::session_distribution;
use crate::session::PolicyKind;
use crate::simulate::simulate;

/// What the tuner aims for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuneTargets {
    /// Desired average profit per game (negative favours the house).
    pub target_profit: f64,
    /// Desired fraction of winning games.
    pub target_win_rate: f64,
    /// Weight of the win-rate term.
    pub lambda: f64,
}

impl Default for TuneTargets {
    fn default() -> Self {
        Self {
            target_profit: -0.25,
            target_win_rate: 0.4,
            lambda: 1.0,
        }
    }
}

impl TuneTargets {
    /// Loss for a measured average profit and win rate.
    pub fn loss(&self, score: Score) -> f64 {
        (score.avg_profit - self.target_profit).abs()
            + self.lambda * (score.win_rate - self.target_win_rate).powi(2)
    }
}

/// How candidate configurations are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Simulate `games` sessions. Every candidate uses the same seed.
    MonteCarlo {
        /// Sessions per evaluation.
        games: u64,
        /// Batch seed.
        seed: u64,
    },
    /// Use the exact session distribution.
    Exact,
}

/// Average profit and win rate of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Average profit per game.
    pub avg_profit: f64,
    /// Fraction of games with positive profit.
    pub win_rate: f64,
}

/// Settings for a tuning run.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuner {
    /// Loss targets.
    pub targets: TuneTargets,
    /// Scoring method.
    pub evaluation: Evaluation,
    /// Stopping policy used while scoring.
    pub policy: PolicyKind,
    /// Maximum number of sweeps.
    pub max_iterations: usize,
}

impl Default for Tuner {
    fn default() -> Self {
        Self {
            targets: TuneTargets::default(),
            evaluation: Evaluation::MonteCarlo {
                games: 50_000,
                seed: 42,
            },
            policy: PolicyKind::Heuristic,
            max_iterations: 1000,
        }
    }
}

/// Result of a tuning run.
#[derive(Debug, Clone, PartialEq)]
pub struct TuneOutcome {
    /// The best configuration found.
    pub config: GameConfig,
    /// Its score.
    pub score: Score,
    /// Its loss.
    pub loss: f64,
    /// Sweeps performed.
    pub iterations: usize,
}

/// Parameters the tuner adjusts, in sweep order.
pub const TUNABLE: [Param; 13] = [
    Param::Stake,
    Param::NumDice,
    Param::MaxRolls,
    Param::NoWinHalfWidth,
    Param::Threshold(0),
    Param::Threshold(1),
    Param::Threshold(2),
    Param::Threshold(3),
    Param::Payout(0),
    Param::Payout(1),
    Param::Payout(2),
    Param::Payout(3),
    Param::Payout(4),
];

/// Inclusive search bounds for a tunable parameter, or `None` if it is fixed.
pub fn bounds(param: Param, params: &GameParams) -> Option<(f64, f64)> {
    match param {
        Param::Stake => Some((2.0, 8.0)),
        Param::NumDice => Some((1.0, 6.0)),
        Param::MaxRolls => Some((1.0, 20.0)),
        Param::NoWinHalfWidth => {
            let min_sum = params.num_dice;
            let max_sum = params.num_dice * params.faces;
            Some((0.0, f64::from((max_sum - min_sum) / 2)))
        }
        Param::Threshold(i) if i < 4 => Some((1.0, 18.0)),
        Param::Payout(i) if i < 3 => Some((1.0, 20.0)),
        Param::Payout(_) => Some((2.0, 20.0)),
        Param::Threshold(_) | Param::Faces => None,
    }
}

fn in_bounds(param: Param, params: &GameParams) -> bool {
    bounds(param, params).is_some_and(|(lo, hi)| {
        let value = param.value(params);
        (lo..=hi).contains(&value)
    })
}

fn monotone(params: &GameParams) -> bool {
    params.thresholds[..4].windows(2).all(|w| w[0] <= w[1])
        && params.payouts.windows(2).all(|w| w[0] <= w[1])
}

impl Tuner {
    /// Score a configuration.
    pub fn score(&self, config: &GameConfig) -> Score {
        let policy = self.policy.build(config);
        match self.evaluation {
            Evaluation::MonteCarlo { games, seed } => {
                let tally = simulate(config, &policy, games, seed);
                Score {
                    avg_profit: tally.mean(),
                    win_rate: tally.win_rate(),
                }
            }
            Evaluation::Exact => {
                let dist = session_distribution(config, &policy);
                Score {
                    avg_profit: dist.expected_value(),
                    win_rate: dist.win_probability(),
                }
            }
        }
    }

    /// Search for a configuration that minimises the loss, starting at `start`.
    pub fn run(&self, start: &GameConfig) -> TuneOutcome {
        let mut best = start.clone();
        let mut score = self.score(&best);
        let mut loss = self.targets.loss(score);
        let mut iterations = 0;
        let mut improved = true;

        while improved && iterations < self.max_iterations {
            improved = false;
            info!(
                iteration = iterations,
                avg_profit = score.avg_profit,
                win_rate = score.win_rate,
                loss,
                "tuning sweep"
            );

            for param in TUNABLE {
                for delta in [1, -1] {
                    let mut candidate = best.params().clone();
                    param.adjust(&mut candidate, delta);
                    if !in_bounds(param, &candidate) || !monotone(&candidate) {
                        continue;
                    }
                    let Ok(config) = candidate.build() else {
                        continue;
                    };
                    let candidate_score = self.score(&config);
                    let candidate_loss = self.targets.loss(candidate_score);
                    debug!(%param, delta, candidate_loss, "candidate");
                    if candidate_loss < loss {
                        info!(
                            %param,
                            value = param.value(config.params()),
                            avg_profit = candidate_score.avg_profit,
                            win_rate = candidate_score.win_rate,
                            loss = candidate_loss,
                            "improved"
                        );
                        best = config;
                        score = candidate_score;
                        loss = candidate_loss;
                        improved = true;
                        break;
                    }
                }
            }
            iterations += 1;
        }

        TuneOutcome {
            config: best,
            score,
            loss,
            iterations,
        }
    }
}
