//! Monte Carlo batches of independent sessions.
//!
//! Games are split into fixed-size chunks. Each chunk owns an RNG seeded from
//! the batch seed and its chunk index, so chunks never share random state and
//! a given seed produces the same tally no matter how many threads run it.

use rand::rngs::{OsRng, StdRng};
use rand::{SeedableRng, TryRngCore};
use rayon::prelude::*;
use tracing::debug;

use crate::config::GameConfig;
use crate::error::{MechError, MechResult};
use crate::session::{StoppingPolicy, play_session_with};
use crate::stats::Tally;

/// Games played per chunk.
pub const CHUNK_SIZE: u64 = 4096;

/// Play `games` independent sessions and tally their profits.
pub fn simulate(config: &GameConfig, policy: &StoppingPolicy, games: u64, seed: u64) -> Tally {
    let chunks = games.div_ceil(CHUNK_SIZE);
    debug!(games, chunks, seed, "simulating");
    (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let start = chunk * CHUNK_SIZE;
            let count = CHUNK_SIZE.min(games - start);
            let mut rng = StdRng::seed_from_u64(chunk_seed(seed, chunk));
            (0..count)
                .map(|_| play_session_with(config, policy, &mut rng))
                .collect::<Tally>()
        })
        .reduce(Tally::new, |mut acc, part| {
            acc.merge(&part);
            acc
        })
}

/// Seed for one chunk of a batch.
pub fn chunk_seed(seed: u64, chunk: u64) -> u64 {
    seed.wrapping_add(chunk.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// A fresh seed drawn from the operating system's entropy source.
pub fn entropy_seed() -> MechResult<u64> {
    OsRng
        .try_next_u64()
        .map_err(|e| MechError::Entropy(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::session_distribution;
    use crate::rules;

    #[test]
    fn plays_requested_number_of_games() {
        let config = GameConfig::default();
        let policy = StoppingPolicy::heuristic();
        for games in [0, 1, CHUNK_SIZE - 1, CHUNK_SIZE, CHUNK_SIZE + 1, 10_000] {
            assert_eq!(simulate(&config, &policy, games, 1).total(), games);
        }
    }

    #[test]
    fn same_seed_same_tally() {
        let config = GameConfig::default();
        let policy = StoppingPolicy::heuristic();
        let a = simulate(&config, &policy, 20_000, 42);
        let b = simulate(&config, &policy, 20_000, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn only_possible_profits_appear() {
        let config = GameConfig::default();
        let possible = rules::possible_profits(&config);
        let tally = simulate(&config, &StoppingPolicy::heuristic(), 5_000, 3);
        assert!(tally.iter().all(|(profit, _)| possible.contains(&profit)));
    }

    #[test]
    fn converges_to_exact_distribution() {
        let config = GameConfig::default();
        let policy = StoppingPolicy::heuristic();
        let exact = session_distribution(&config, &policy);
        let tally = simulate(&config, &policy, 200_000, 2024);
        for (profit, p) in exact.iter() {
            let observed = tally.probability(profit);
            assert!(
                (observed - p).abs() < 0.01,
                "profit {profit}: observed {observed}, exact {p}"
            );
        }
        assert!((tally.mean() - exact.expected_value()).abs() < 0.05);
    }

    #[test]
    fn chunk_seeds_differ() {
        assert_ne!(chunk_seed(7, 0), chunk_seed(7, 1));
        assert_eq!(chunk_seed(7, 0), 7);
    }

    #[test]
    fn entropy_seed_is_available() {
        assert!(entropy_seed().is_ok());
    }
}
