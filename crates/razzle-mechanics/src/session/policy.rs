//! Stopping policies: when a player stops rolling and cashes out.
//!
//! A policy is an ordered list of [`StopRule`] guards. After every roll that
//! does not bust, the guards are checked in order and the first one that
//! applies ends the session. Order matters: the heuristic policy cashes out at
//! step 3 and above before it ever looks at how many rolls remain.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::optimal::{self, StopTable};
use crate::rules::Step;

/// A single cash-out guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StopRule {
    /// Cash out once progress reaches `min_step`.
    ReachedStep {
        /// Lowest step that triggers the cash-out.
        min_step: Step,
    },
    /// Cash out at exactly `step` when exactly `rolls_left` rolls remain.
    LockIn {
        /// Step to lock in.
        step: Step,
        /// Rolls remaining after the current roll.
        rolls_left: u32,
    },
    /// Cash out when no rolls remain.
    OutOfRolls,
    /// Cash out wherever a solved stop table says stopping is at least as
    /// good as rolling again.
    Table(StopTable),
}

impl StopRule {
    /// Returns true if this guard ends the session.
    pub fn applies(&self, step: Step, rolls_left: u32) -> bool {
        match self {
            Self::ReachedStep { min_step } => step >= *min_step,
            Self::LockIn {
                step: lock_step,
                rolls_left: lock_rolls,
            } => step == *lock_step && rolls_left == *lock_rolls,
            Self::OutOfRolls => rolls_left == 0,
            Self::Table(table) => table.should_stop(step),
        }
    }
}

impl std::fmt::Display for StopRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReachedStep { min_step } => write!(f, "reached step {min_step}"),
            Self::LockIn { step, rolls_left } => {
                write!(f, "lock in step {step} with {rolls_left} roll(s) left")
            }
            Self::OutOfRolls => write!(f, "out of rolls"),
            Self::Table(_) => write!(f, "stop table"),
        }
    }
}

/// An ordered list of cash-out guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoppingPolicy {
    rules: Vec<StopRule>,
}

impl Default for StoppingPolicy {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl StoppingPolicy {
    /// Build a policy from guards evaluated in the given order.
    pub fn from_rules(rules: Vec<StopRule>) -> Self {
        Self { rules }
    }

    /// The reference play style: cash out at step 3 or higher, lock in step 2
    /// with one roll left, and otherwise roll until the rolls run out.
    pub fn heuristic() -> Self {
        Self::from_rules(vec![
            StopRule::ReachedStep { min_step: 3 },
            StopRule::LockIn {
                step: 2,
                rolls_left: 1,
            },
            StopRule::OutOfRolls,
        ])
    }

    /// Always roll until the rolls run out.
    pub fn exhaust() -> Self {
        Self::from_rules(vec![StopRule::OutOfRolls])
    }

    /// Stop wherever value iteration says continuing does not pay.
    pub fn optimal(config: &GameConfig) -> Self {
        let solution = optimal::solve(config);
        Self::from_rules(vec![
            StopRule::Table(solution.table),
            StopRule::OutOfRolls,
        ])
    }

    /// The guards in evaluation order.
    pub fn rules(&self) -> &[StopRule] {
        &self.rules
    }

    /// The first guard that ends the session at `step` with `rolls_left`
    /// rolls remaining, if any.
    pub fn should_stop(&self, step: Step, rolls_left: u32) -> Option<&StopRule> {
        self.rules.iter().find(|rule| rule.applies(step, rolls_left))
    }
}

/// Named policy choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PolicyKind {
    /// [`StoppingPolicy::heuristic`].
    #[default]
    Heuristic,
    /// [`StoppingPolicy::optimal`].
    Optimal,
    /// [`StoppingPolicy::exhaust`].
    Exhaust,
}

impl PolicyKind {
    /// Build the policy for a configuration.
    pub fn build(self, config: &GameConfig) -> StoppingPolicy {
        match self {
            Self::Heuristic => StoppingPolicy::heuristic(),
            Self::Optimal => StoppingPolicy::optimal(config),
            Self::Exhaust => StoppingPolicy::exhaust(),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heuristic => write!(f, "heuristic"),
            Self::Optimal => write!(f, "optimal"),
            Self::Exhaust => write!(f, "exhaust"),
        }
    }
}
