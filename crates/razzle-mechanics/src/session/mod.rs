//! Session simulator: one playthrough from stake to bust or cash-out.
//!
//! A [`Session`] starts in [`SessionState::Rolling`] at step 0 with the full
//! roll allowance. Each roll:
//!
//! 1. uses up one roll,
//! 2. maps the dice sum to a candidate step through the rule engine,
//! 3. busts immediately if the candidate is step 0,
//! 4. otherwise keeps the higher of the candidate and the current step,
//! 5. asks the [`StoppingPolicy`] whether to cash out.
//!
//! A session with no rolls left always cashes out, whatever the policy says.

pub mod policy;

pub use policy::{PolicyKind, StopRule, StoppingPolicy};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::dice::DicePool;
use crate::rules::{self, NO_PROGRESS, Step};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Still rolling.
    Rolling,
    /// A roll landed in the fail band; the stake is lost.
    Busted,
    /// The player stopped and collected the payout for their step.
    CashedOut,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rolling => write!(f, "rolling"),
            Self::Busted => write!(f, "busted"),
            Self::CashedOut => write!(f, "cashed out"),
        }
    }
}

/// The effect of a single roll on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The roll busted the session.
    Bust,
    /// The session ends at this step.
    CashOut(Step),
    /// The session continues at this step.
    Continue(Step),
}

/// Apply one roll with dice total `sum` to a session at `current` step that
/// has `rolls_left` rolls remaining after this roll.
pub fn transition(
    config: &GameConfig,
    policy: &StoppingPolicy,
    current: Step,
    rolls_left: u32,
    sum: u32,
) -> Transition {
    let candidate = rules::next_step(sum, config);
    if candidate == NO_PROGRESS {
        return Transition::Bust;
    }
    let step = candidate.max(current);
    if rolls_left == 0 || policy.should_stop(step, rolls_left).is_some() {
        Transition::CashOut(step)
    } else {
        Transition::Continue(step)
    }
}

/// A single playthrough.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    config: &'a GameConfig,
    policy: &'a StoppingPolicy,
    step: Step,
    rolls_left: u32,
    rolls_taken: u32,
    state: SessionState,
}

impl<'a> Session<'a> {
    /// Start a session at step 0 with the configured roll allowance.
    pub fn new(config: &'a GameConfig, policy: &'a StoppingPolicy) -> Self {
        Self {
            config,
            policy,
            step: NO_PROGRESS,
            rolls_left: config.max_rolls(),
            rolls_taken: 0,
            state: SessionState::Rolling,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Highest step reached so far.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Rolls not yet used.
    pub fn rolls_left(&self) -> u32 {
        self.rolls_left
    }

    /// Rolls used so far.
    pub fn rolls_taken(&self) -> u32 {
        self.rolls_taken
    }

    /// Returns true once the session has busted or cashed out.
    pub fn is_finished(&self) -> bool {
        self.state != SessionState::Rolling
    }

    /// Apply a roll whose dice total `sum`. Has no effect once finished.
    pub fn apply_sum(&mut self, sum: u32) -> SessionState {
        if self.is_finished() {
            return self.state;
        }
        self.rolls_left -= 1;
        self.rolls_taken += 1;

        match transition(self.config, self.policy, self.step, self.rolls_left, sum) {
            Transition::Bust => {
                self.state = SessionState::Busted;
                debug!(sum, rolls = self.rolls_taken, "session busted");
            }
            Transition::CashOut(step) => {
                self.step = step;
                self.state = SessionState::CashedOut;
                debug!(step, rolls = self.rolls_taken, "session cashed out");
            }
            Transition::Continue(step) => {
                trace!(sum, step, rolls_left = self.rolls_left, "roll");
                self.step = step;
            }
        }
        self.state
    }

    /// Roll `pool` and apply the total.
    pub fn roll<R: Rng + ?Sized>(&mut self, pool: &DicePool, rng: &mut R) -> SessionState {
        let total = pool.roll(rng).total();
        self.apply_sum(total)
    }

    /// Net profit once the session has finished.
    pub fn outcome(&self) -> Option<i64> {
        match self.state {
            SessionState::Rolling => None,
            SessionState::Busted => Some(-self.config.stake()),
            SessionState::CashedOut => Some(rules::profit(self.step, self.config)),
        }
    }
}

/// Play one session with the heuristic stopping policy and return the profit.
pub fn play_session<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> i64 {
    play_session_with(config, &StoppingPolicy::heuristic(), rng)
}

/// Play one session with the given stopping policy and return the profit.
pub fn play_session_with<R: Rng + ?Sized>(
    config: &GameConfig,
    policy: &StoppingPolicy,
    rng: &mut R,
) -> i64 {
    let pool = DicePool::for_config(config);
    let mut session = Session::new(config, policy);
    while !session.is_finished() {
        session.roll(&pool, rng);
    }
    // Every roll either finishes the session or leaves at least one roll.
    session.outcome().unwrap_or(-config.stake())
}
