//! Game engine for Razzle, a dice wagering game.
//!
//! A player pays a stake and rolls a pool of dice. Sums that land in the
//! central fail band end the game with nothing; other sums move the player up
//! a ladder of payout steps. The player may cash out between rolls.
//!
//! The crate provides the rule engine, a session state machine with pluggable
//! stopping policies, exact outcome distributions, optimal stopping by value
//! iteration, seeded Monte Carlo batches, and a parameter tuner.

pub mod config;
pub mod dice;
pub mod distribution;
pub mod error;
pub mod optimal;
pub mod rules;
pub mod session;
pub mod simulate;
pub mod stats;
pub mod tune;

pub use config::{GameConfig, GameParams, Param};
pub use dice::{DicePool, Die, RollResult};
pub use distribution::{ProfitDistribution, SumDistribution, one_roll, session_distribution};
pub use error::{MechError, MechResult};
pub use optimal::{OptimalSolution, StopTable};
pub use rules::{FailBand, Step};
pub use session::{
    PolicyKind, Session, SessionState, StopRule, StoppingPolicy, play_session, play_session_with,
};
pub use simulate::{entropy_seed, simulate};
pub use stats::Tally;
pub use tune::{Evaluation, Score, TuneOutcome, TuneTargets, Tuner};
