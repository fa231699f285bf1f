//! Optimal stopping by value iteration.
//!
//! Builds the one-roll transition matrix between steps from the exact sum
//! distribution, then iterates `V[s] = max(payout(s), E[V[s'] | s])` to a fixed
//! point. The horizon is unbounded and rolling has no cost beyond the stake,
//! which is already paid. A bust is absorbing and worth nothing.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::distribution::SumDistribution;
use crate::rules::{self, MAX_STEP, NO_PROGRESS, Step};

/// Number of states, steps 0 through 5.
pub const STATES: usize = MAX_STEP as usize + 1;

/// Value-iteration sweeps.
pub const ITERATIONS: usize = 100;

/// Per-step stop/continue decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTable {
    stop: [bool; STATES],
}

impl StopTable {
    /// Build a table from explicit decisions, indexed by step.
    pub fn new(stop: [bool; STATES]) -> Self {
        Self { stop }
    }

    /// Returns true if the player should cash out at `step`.
    pub fn should_stop(&self, step: Step) -> bool {
        self.stop.get(usize::from(step)).copied().unwrap_or(true)
    }
}

/// Probabilities of moving between steps on one roll.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    /// `to[s][t]`: probability of landing on step `t` from step `s`.
    pub to: [[f64; STATES]; STATES],
    /// `bust[s]`: probability of busting from step `s`.
    pub bust: [f64; STATES],
}

impl TransitionMatrix {
    /// Build the matrix for a configuration, applying the monotone clamp.
    pub fn build(config: &GameConfig) -> Self {
        let sums = SumDistribution::for_config(config);
        let mut to = [[0.0; STATES]; STATES];
        let mut bust = [0.0; STATES];
        for (from, row) in to.iter_mut().enumerate() {
            for (sum, p) in sums.iter() {
                let candidate = rules::next_step(sum, config);
                if candidate == NO_PROGRESS {
                    bust[from] += p;
                } else {
                    row[usize::from(candidate).max(from)] += p;
                }
            }
        }
        Self { to, bust }
    }

    /// Expected value of rolling once more from `from`, given state values.
    pub fn continuation(&self, from: usize, values: &[f64; STATES]) -> f64 {
        self.to[from]
            .iter()
            .zip(values.iter())
            .map(|(p, v)| p * v)
            .sum()
    }
}

/// Result of solving the stopping problem.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalSolution {
    /// Value of each state under optimal play.
    pub values: [f64; STATES],
    /// Payout for stopping in each state.
    pub stop_values: [f64; STATES],
    /// Expected value of rolling again; `None` at the top step.
    pub continue_values: [Option<f64>; STATES],
    /// The resulting decisions.
    pub table: StopTable,
}

/// Solve the stopping problem for a configuration.
pub fn solve(config: &GameConfig) -> OptimalSolution {
    let matrix = TransitionMatrix::build(config);
    let mut stop_values = [0.0; STATES];
    for (step, value) in stop_values.iter_mut().enumerate() {
        *value = rules::payout(step as Step, config) as f64;
    }

    let mut values = stop_values;
    for _ in 0..ITERATIONS {
        let mut next = values;
        for (s, value) in next.iter_mut().enumerate().take(STATES - 1) {
            *value = stop_values[s].max(matrix.continuation(s, &values));
        }
        values = next;
    }

    let continue_values: [Option<f64>; STATES] =
        std::array::from_fn(|s| (s < STATES - 1).then(|| matrix.continuation(s, &values)));
    let stop = std::array::from_fn(|s| {
        continue_values[s].is_none_or(|cont| cont <= stop_values[s])
    });

    OptimalSolution {
        values,
        stop_values,
        continue_values,
        table: StopTable::new(stop),
    }
}
