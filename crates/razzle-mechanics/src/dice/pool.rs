//! A pool of identical dice thrown together.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Die;
use super::roll::RollResult;
use crate::config::GameConfig;

/// `count` copies of one die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    die: Die,
    count: u32,
}

impl DicePool {
    /// A pool of `count` dice like `die`.
    pub fn new(die: Die, count: u32) -> Self {
        Self { die, count }
    }

    /// The pool a configuration throws each turn.
    pub fn for_config(config: &GameConfig) -> Self {
        Self::new(Die::new(config.faces()), config.num_dice())
    }

    /// The die type in the pool.
    pub fn die(&self) -> Die {
        self.die
    }

    /// Number of dice.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Smallest possible total.
    pub fn min_total(&self) -> u32 {
        self.count
    }

    /// Largest possible total.
    pub fn max_total(&self) -> u32 {
        self.count * self.die.faces()
    }

    /// Throw every die once.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> RollResult {
        RollResult::new((0..self.count).map(|_| self.die.roll(rng)).collect())
    }
}

impl std::fmt::Display for DicePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.die)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameParams;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_config_pool() {
        let pool = DicePool::for_config(&GameConfig::default());
        assert_eq!(pool.to_string(), "3d6");
        assert_eq!(pool.min_total(), 3);
        assert_eq!(pool.max_total(), 18);
    }

    #[test]
    fn pool_follows_config() {
        let config = GameParams::default()
            .with_num_dice(2)
            .with_faces(10)
            .build()
            .unwrap();
        let pool = DicePool::for_config(&config);
        assert_eq!(pool.count(), 2);
        assert_eq!(pool.die().faces(), 10);
        assert_eq!(pool.max_total(), 20);
    }

    #[test]
    fn totals_stay_in_range() {
        let pool = DicePool::new(Die::D6, 3);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let roll = pool.roll(&mut rng);
            assert_eq!(roll.len(), 3);
            assert!((3..=18).contains(&roll.total()));
        }
    }

    #[test]
    fn same_seed_same_roll() {
        let pool = DicePool::new(Die::D6, 3);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(pool.roll(&mut a), pool.roll(&mut b));
    }
}
